//! Off-chain document schemas of a hotel.
//!
//! The url stored on the ledger addresses the data index, which only holds
//! pointers to the documents that carry the actual data.

use ledgerproxy_offchain::FieldDef;

/// Field of the data index pointing at the description document.
pub const DESCRIPTION: &str = "descriptionUri";
/// Field of the data index pointing at the rate plans document.
pub const RATE_PLANS: &str = "ratePlansUri";
/// Field of the data index pointing at the availability document.
pub const AVAILABILITY: &str = "availabilityUri";

/// Schema of the document the ledger url points at.
pub fn data_index() -> Vec<FieldDef> {
    vec![
        FieldDef::pointer(DESCRIPTION, description()),
        FieldDef::pointer(RATE_PLANS, rate_plans()),
        FieldDef::pointer(AVAILABILITY, availability()),
    ]
}

/// Schema of the hotel description.
pub fn description() -> Vec<FieldDef> {
    values(&[
        "name",
        "description",
        "contacts",
        "address",
        "timezone",
        "currency",
        "images",
        "amenities",
        "updatedAt",
    ])
}

pub fn rate_plans() -> Vec<FieldDef> {
    values(&["ratePlans", "updatedAt"])
}

pub fn availability() -> Vec<FieldDef> {
    values(&["latestSnapshot", "updates", "updatedAt"])
}

fn values(names: &[&str]) -> Vec<FieldDef> {
    names.iter().copied().map(FieldDef::from).collect()
}
