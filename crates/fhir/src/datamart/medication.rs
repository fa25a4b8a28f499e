use super::{datamart_kind, DatamartKind};
use serde::{Deserialize, Serialize};

/// A drug product. It points at nothing else, so only its own id is rewritten.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamartMedication {
    #[serde(default = "object_type")]
    pub object_type: String,

    pub cdw_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_drug_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rxnorm: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

fn object_type() -> String {
    DatamartMedication::OBJECT_TYPE.to_string()
}

impl Default for DatamartMedication {
    fn default() -> Self {
        Self {
            object_type: object_type(),
            cdw_id: String::new(),
            local_drug_name: None,
            rxnorm: None,
            product: None,
        }
    }
}

datamart_kind!(DatamartMedication, Medication, "Medication");
