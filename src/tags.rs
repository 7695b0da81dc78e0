//! Field names used in info-handler records and run configurations.

/// Record field names as emitted by the country and model info handlers.
///
/// Each constant's value is the field name it stands for.
#[allow(missing_docs)]
pub mod field {
    pub const ID: &str = "ID";
    pub const NAME: &str = "Name";
    pub const SHORT_NAME: &str = "ShortName";
    pub const ORDER: &str = "Order";
    pub const SPINE_ORDER: &str = "SpineOrder";
    pub const COMMENT: &str = "Comment";
    pub const PRIVATE: &str = "Private";
    pub const POL_ID: &str = "PolID";
    pub const REF_POL_ID: &str = "RefPolID";
    pub const FUN_ID: &str = "FunID";
    pub const PAR_ID: &str = "ParID";
    pub const SYS_ID: &str = "SysID";
    pub const DATA_ID: &str = "DataID";
    pub const EXTENSION_ID: &str = "ExtensionID";
    pub const SWITCH: &str = "Switch";
    pub const VALUE: &str = "Value";
    pub const GROUP: &str = "Group";
    pub const YEAR: &str = "Year";
    pub const CURRENCY: &str = "Currency";
    pub const CURRENCY_OUTPUT: &str = "CurrencyOutput";
    pub const CURRENCY_PARAM: &str = "CurrencyParam";
    pub const HEAD_DEF_INC: &str = "HeadDefInc";
    pub const BEST_MATCH: &str = "BestMatch";
    pub const COICOP_VERSION: &str = "CoicopVersion";
    pub const DECIMAL_SIGN: &str = "DecimalSign";
    pub const READ_X_VARIABLES: &str = "ReadXVariables";
    pub const USE_COMMON_DEFAULT: &str = "UseCommonDefault";
    pub const YEAR_COLLECTION: &str = "YearCollection";
    pub const YEAR_INC: &str = "YearInc";
}

/// Keys of the configuration mapping sent to the engine.
pub mod config {
    /// Project root.
    pub const PATH_EUROMODFILES: &str = "PATH_EUROMODFILES";
    /// Directory holding the input data.
    pub const PATH_DATA: &str = "PATH_DATA";
    /// Directory output files are written to.
    pub const PATH_OUTPUT: &str = "PATH_OUTPUT";
    /// Dataset ID.
    pub const ID_DATA: &str = "ID_DATA";
    /// Country code.
    pub const COUNTRY: &str = "COUNTRY";
    /// System name.
    pub const ID_SYSTEM: &str = "ID_SYSTEM";
    /// Prefix of the indexed addon keys (`ADDON0`, `ADDON1`, ...).
    pub const ADDON: &str = "ADDON";
    /// Prefix of the indexed extension switch keys (`SWITCH0`, ...).
    pub const SWITCH: &str = "SWITCH";
}

/// Value a yes/no record field carries when set.
pub const YES: &str = "yes";

/// Project sub-directory holding the per-country XML folders.
pub const COUNTRIES_DIR: [&str; 2] = ["XMLParam", "Countries"];

/// Project sub-directory holding input datasets.
pub const INPUT_DIR: &str = "Input";
