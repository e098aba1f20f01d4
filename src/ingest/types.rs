// src/ingest/types.rs
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One (customer, sale) row of the raw transaction table. Only the columns the
/// profiler reads are modelled; anything else in the source is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    #[serde(rename = "transID")]
    pub trans_id: String,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "ageGroup", default)]
    pub age_group: Option<String>,
    #[serde(rename = "MosaicType", default)]
    pub mosaic_type: Option<String>,
    #[serde(rename = "CustomerState", default)]
    pub customer_state: Option<String>,
    #[serde(rename = "CustPop", default)]
    pub cust_pop: Option<String>, // cohort assigned via the customer
    #[serde(rename = "SalePop", default)]
    pub sale_pop: Option<String>, // cohort assigned via the sale
    #[serde(rename = "MTypePrimary", default)]
    pub mtype_primary: Option<String>,
    #[serde(rename = "MTypeSecondary", default)]
    pub mtype_secondary: Option<String>,
}

impl Transaction {
    /// The identity pair that must be unique across the working set.
    pub fn key(&self) -> (&str, &str) {
        (self.customer_id.as_str(), self.trans_id.as_str())
    }
}

/// Where the raw table comes from (file, cache, test fixture).
pub trait TransactionSource {
    fn load(&self) -> Result<Vec<Transaction>>;
    fn name(&self) -> &'static str;
}
