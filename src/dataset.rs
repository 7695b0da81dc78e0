//! Datasets registered for a country.

use std::sync::{Arc, Weak};

use crate::container::{truncate_comment, Describable};
use crate::country::Country;
use crate::error::EuromodResult;
use crate::record::Record;
use crate::spine::{upgrade, Identified};
use crate::tags::field;

/// A dataset a country's systems can run on.
#[derive(Debug)]
pub struct Dataset {
    /// Dataset ID.
    pub id: String,
    /// Dataset name; the key in country containers.
    pub name: String,
    /// Free-text comment.
    pub comment: String,
    /// Currency of monetary variables.
    pub currency: String,
    /// COICOP classification version.
    pub coicop_version: String,
    /// Decimal sign used in the file.
    pub decimal_sign: String,
    /// `yes` when the dataset is private.
    pub private: String,
    /// Whether `x` variables are read.
    pub read_x_variables: String,
    /// Whether common defaults apply.
    pub use_common_default: String,
    /// Year the data was collected.
    pub year_collection: String,
    /// Income reference year.
    pub year_inc: String,
    /// The record the dataset was built from.
    pub record: Record,
    country: Weak<Country>,
}

impl Dataset {
    pub(crate) fn new(record: Record, country: Weak<Country>) -> Self {
        Self {
            id: record.get(field::ID).to_string(),
            name: record.get(field::NAME).to_string(),
            comment: record.get(field::COMMENT).to_string(),
            currency: record.get(field::CURRENCY).to_string(),
            coicop_version: record.get(field::COICOP_VERSION).to_string(),
            decimal_sign: record.get(field::DECIMAL_SIGN).to_string(),
            private: record.get_or(field::PRIVATE, "no"),
            read_x_variables: record.get(field::READ_X_VARIABLES).to_string(),
            use_common_default: record.get(field::USE_COMMON_DEFAULT).to_string(),
            year_collection: record.get(field::YEAR_COLLECTION).to_string(),
            year_inc: record.get(field::YEAR_INC).to_string(),
            record,
            country,
        }
    }

    /// The owning country.
    pub fn country(&self) -> EuromodResult<Arc<Country>> {
        upgrade(&self.country, &format!("dataset {}", self.name))
    }
}

impl Identified for Dataset {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Describable for Dataset {
    fn short_repr(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn end_repr(&self) -> Option<String> {
        Some(truncate_comment(&self.comment))
    }
}
