//! Table descriptors, one per resource kind

/// Static description of a key-value table: its name and the attribute that
/// holds each record's unique identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableSpec {
    pub name: &'static str,
    pub key_field: &'static str,
}

pub const TENANTS: TableSpec = TableSpec {
    name: "tenant_details",
    key_field: "tenantId",
};

pub const TENANT_REGISTRATIONS: TableSpec = TableSpec {
    name: "tenant_registrations",
    key_field: "tenantRegistrationId",
};

pub const USERS: TableSpec = TableSpec {
    name: "users",
    key_field: "userName",
};

pub const SUBSCRIBERS: TableSpec = TableSpec {
    name: "subscribers",
    key_field: "customerIdentifier",
};

pub const BILLING_CUSTOMERS: TableSpec = TableSpec {
    name: "billing_customers",
    key_field: "customerId",
};

pub const BILLING_RECORDS: TableSpec = TableSpec {
    name: "billing_records",
    key_field: "billingRecordId",
};
