use crate::domain::model::{CardRow, Table};
use crate::utils::error::{BoxerError, Result};

pub const CARD_NUMBER: &str = "카드번호";
pub const FACE_AMOUNT: &str = "권면금액";
pub const PRODUCT_NUMBER: &str = "상품번호";
pub const SEQUENCE: &str = "시퀀스";
pub const BRANCH_NUMBER: &str = "영업점번호";
pub const BRANCH_NAME: &str = "영업점명";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    CARD_NUMBER,
    FACE_AMOUNT,
    PRODUCT_NUMBER,
    SEQUENCE,
    BRANCH_NUMBER,
    BRANCH_NAME,
];

/// Required columns absent from `columns`, in declaration order.
pub fn missing_columns(columns: &[String]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !columns.iter().any(|c| c == *required))
        .map(|required| required.to_string())
        .collect()
}

/// Checks the header once and maps every row into a [`CardRow`].
///
/// Fails with [`BoxerError::MissingColumns`] before touching any row.
/// Rows shorter than the header read the absent cells as empty strings.
pub fn validate_schema(table: &Table) -> Result<Vec<CardRow>> {
    let missing = missing_columns(&table.columns);
    if !missing.is_empty() {
        return Err(BoxerError::MissingColumns { missing });
    }

    let index_of = |name: &str| {
        table
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| BoxerError::MissingColumns {
                missing: vec![name.to_string()],
            })
    };
    let card_number = index_of(CARD_NUMBER)?;
    let face_amount = index_of(FACE_AMOUNT)?;
    let product_number = index_of(PRODUCT_NUMBER)?;
    let sequence = index_of(SEQUENCE)?;
    let branch_number = index_of(BRANCH_NUMBER)?;
    let branch_name = index_of(BRANCH_NAME)?;

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let cell = |idx: usize| row.get(idx).cloned().unwrap_or_default();
            CardRow {
                card_number: cell(card_number),
                face_amount: cell(face_amount),
                product_number: cell(product_number),
                sequence: cell(sequence),
                branch_number: cell(branch_number),
                branch_name: cell(branch_name),
            }
        })
        .collect();

    tracing::debug!("Schema validated, {} rows mapped", table.len());
    Ok(rows)
}
