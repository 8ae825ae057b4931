use serde::{Deserialize, Serialize};

/// Raw tabular input: a header row plus text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One card record. All fields stay text so zero-padded identifiers survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRow {
    pub card_number: String,
    pub face_amount: String,
    pub product_number: String,
    pub sequence: String,
    pub branch_number: String,
    pub branch_name: String,
}

/// Summary of one box. Serialized field names are the export headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRecord {
    #[serde(rename = "번호")]
    pub sequence_number: usize,
    #[serde(rename = "박스번호")]
    pub box_number: usize,
    #[serde(rename = "앞번호")]
    pub front_card: String,
    #[serde(rename = "뒷번호")]
    pub back_card: String,
    #[serde(rename = "매수")]
    pub count: usize,
    #[serde(rename = "카드명")]
    pub branch_name: String,
    #[serde(rename = "권종")]
    pub denomination: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSummary {
    pub branch_name: String,
    pub rows: usize,
    pub boxes: usize,
}

#[derive(Debug, Clone)]
pub struct BoxingResult {
    pub unit: usize,
    pub total_rows: usize,
    pub boxes: Vec<BoxRecord>,
}

impl BoxingResult {
    /// 依分店首次出現順序彙總
    pub fn branch_summaries(&self) -> Vec<BranchSummary> {
        let mut summaries: Vec<BranchSummary> = Vec::new();
        for record in &self.boxes {
            match summaries.last_mut() {
                Some(last) if last.branch_name == record.branch_name => {
                    last.rows += record.count;
                    last.boxes += 1;
                }
                _ => summaries.push(BranchSummary {
                    branch_name: record.branch_name.clone(),
                    rows: record.count,
                    boxes: 1,
                }),
            }
        }
        summaries
    }
}
