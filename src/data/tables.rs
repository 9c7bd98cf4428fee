use crate::error::ReconcileResult;
use crate::service::ingest::RawTable;
use indexmap::IndexMap;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// 读取 CSV 文件为表格，来源标签取文件名
pub fn read_csv_table(path: &Path) -> ReconcileResult<RawTable> {
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let file = std::fs::File::open(path)?;
    read_csv(source, file)
}

/// 从任意读取器解析 CSV；空单元格记为 null
pub fn read_csv<R: Read>(source: impl Into<String>, reader: R) -> ReconcileResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut table = RawTable::new(source, columns);
    for record in rdr.records() {
        let record = record?;
        let row: IndexMap<String, Value> = table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let value = match record.get(idx).map(str::trim) {
                    Some(cell) if !cell.is_empty() => Value::String(cell.to_string()),
                    _ => Value::Null,
                };
                (col.clone(), value)
            })
            .collect();
        table.rows.push(row);
    }

    tracing::debug!("CSV {}: {} 列, {} 行", table.source, table.columns.len(), table.rows.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_headers_in_order_with_nulls() {
        let data = "\u{feff}Campaign name,Amount spent (EGP)\nSummer Sale,10.5\nWinter Coat,\n";
        let table = read_csv("fb.csv", data.as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["Campaign name", "Amount spent (EGP)"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["Amount spent (EGP)"], Value::String("10.5".into()));
        assert_eq!(table.rows[1]["Amount spent (EGP)"], Value::Null);
    }

    #[test]
    fn short_rows_fill_with_null() {
        let data = "Product,Delivered\nBag\n";
        let table = read_csv("catalog.csv", data.as_bytes()).unwrap();
        assert_eq!(table.rows[0]["Delivered"], Value::Null);
    }

    #[test]
    fn source_label_is_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiktok.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Ad name,Cost\nBag Promo,3").unwrap();

        let table = read_csv_table(&path).unwrap();
        assert_eq!(table.source, "tiktok.csv");
        assert_eq!(table.rows.len(), 1);
    }
}
