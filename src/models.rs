use serde::{Deserialize, Serialize};

pub const DEFAULT_ITEM_NAME: &str = "DIESEL [HSD]";

pub fn today_iso() -> String {
  chrono::Utc::now().format("%Y-%m-%d").to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfile {
  pub company_name: String,
  pub subtitle: String,
  pub address_line1: String,
  pub address_line2: String,
  pub proprietor: String,
  pub cc_code: String,
  pub bank_name: String,
  pub account_no: String,
  pub ifsc_code: String,
  pub account_name: String,
}

impl Default for VendorProfile {
  fn default() -> Self {
    Self {
      company_name: "HARSHA HIGHWAY PETROLEUM".to_string(),
      subtitle: "Bharat Petroleum Corporation Ltd Dealer".to_string(),
      address_line1: "Solapur-Bijapur National Highway(NH-52), Agasanal".to_string(),
      address_line2: "Tq: INDI Dist : Vijayapur".to_string(),
      proprietor: "Harsha Mathapati".to_string(),
      cc_code: "222406".to_string(),
      bank_name: "HDFC BANK, PERUMANALLUR".to_string(),
      account_no: "50200102961948".to_string(),
      ifsc_code: "HDFC0007082".to_string(),
      account_name: "SVS FUELS".to_string(),
    }
  }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
  pub party_name: String,
  pub address_line1: String,
  pub address_line2: String,
}

impl Default for ClientProfile {
  fn default() -> Self {
    Self {
      party_name: "THIRUCHENDUR MURUGAN TRANSPORT".to_string(),
      address_line1: String::new(),
      address_line2: String::new(),
    }
  }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
  pub report_date: String,
  pub from_date: String,
  pub to_date: String,
  pub opening_balance: String,
}

impl Default for ReportMeta {
  fn default() -> Self {
    let today = today_iso();
    Self {
      report_date: today.clone(),
      from_date: today.clone(),
      to_date: today,
      opening_balance: "0".to_string(),
    }
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
  pub id: String,
  pub bill_no: String,
  pub date: String,
  pub vehicle_no: String,
  pub indent: String,
  pub item_name: String,
  pub quantity: f64,
  pub rate: f64,
  pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
  #[serde(default)]
  pub vendor: VendorProfile,
  #[serde(default)]
  pub client: ClientProfile,
  #[serde(default)]
  pub meta: ReportMeta,
  #[serde(default)]
  pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
  #[serde(default)]
  pub bill_no: Option<String>,
  #[serde(default)]
  pub date: Option<String>,
  #[serde(default)]
  pub vehicle_no: Option<String>,
  #[serde(default)]
  pub indent: Option<String>,
  #[serde(default)]
  pub item_name: Option<String>,
  #[serde(default)]
  pub quantity: Option<f64>,
  #[serde(default)]
  pub rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdateInput {
  pub id: String,
  #[serde(flatten)]
  pub patch: TransactionPatch,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDeleteInput {
  pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRateInput {
  pub rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartFillInput {
  pub start_bill_no: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateSummary {
  pub updated: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
  pub imported: usize,
  pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
  pub file_name: String,
  pub content_type: String,
  pub data_base64: String,
  pub saved_path: String,
}
