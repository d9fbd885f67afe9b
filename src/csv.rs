//! CSV エンコーダ
//!
//! 同じ列構成のレコード列を CSV テキストへ変換する

use std::fmt;

/// CSV セルに入るスカラー値
#[derive(Debug, Clone, PartialEq)]
pub enum CsvValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Empty,
}

impl fmt::Display for CsvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvValue::Text(s) => f.write_str(s),
            CsvValue::Integer(n) => write!(f, "{}", n),
            CsvValue::Number(n) => write!(f, "{}", n),
            CsvValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CsvValue {
    fn from(s: &str) -> Self {
        CsvValue::Text(s.to_string())
    }
}

impl From<String> for CsvValue {
    fn from(s: String) -> Self {
        CsvValue::Text(s)
    }
}

impl From<i64> for CsvValue {
    fn from(n: i64) -> Self {
        CsvValue::Integer(n)
    }
}

impl From<f64> for CsvValue {
    fn from(n: f64) -> Self {
        CsvValue::Number(n)
    }
}

impl<T: Into<CsvValue>> From<Option<T>> for CsvValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CsvValue::Empty)
    }
}

/// 列名 -> 値 の順序付きレコード
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRecord {
    fields: Vec<(String, CsvValue)>,
}

impl CsvRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 列を追加する（ビルダー形式）
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CsvValue>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&CsvValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// 必要な場合のみダブルクォートで囲む
fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// レコード列を CSV テキストに変換する
///
/// 列順は先頭レコードのキー順。空の入力は空文字列（ヘッダなし）。
/// 行区切りは `\n` で、末尾に改行は付けない。
pub fn encode(records: &[CsvRecord]) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };

    let headers: Vec<&str> = first.keys().collect();
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| escape(h))
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in records {
        let line = headers
            .iter()
            .map(|h| {
                record
                    .get(h)
                    .map(|v| escape(&v.to_string()))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pen() -> CsvRecord {
        CsvRecord::new()
            .with("ID", 1i64)
            .with("name", "Pen")
            .with("price", "¥100")
            .with("qty", 5i64)
    }

    #[test]
    fn test_single_record() {
        assert_eq!(encode(&[pen()]), "ID,name,price,qty\n1,Pen,¥100,5");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let records = vec![pen(), pen().with("extra", "ignored")];
        assert_eq!(encode(&records), encode(&records));
    }

    #[test]
    fn test_rows_follow_header_order() {
        let second = CsvRecord::new()
            .with("qty", 7i64)
            .with("price", "¥5")
            .with("name", "Ink")
            .with("ID", 2i64);
        let csv = encode(&[pen(), second]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "ID,name,price,qty");
        assert_eq!(lines[2], "2,Ink,¥5,7");
    }

    #[test]
    fn test_escaping() {
        let record = CsvRecord::new()
            .with("comma", "a,b")
            .with("quote", "say \"hi\"")
            .with("newline", "line1\nline2")
            .with("plain", "plain");
        let csv = encode(&[record]);
        assert_eq!(
            csv,
            "comma,quote,newline,plain\n\"a,b\",\"say \"\"hi\"\"\",\"line1\nline2\",plain"
        );
    }

    #[test]
    fn test_header_is_escaped() {
        let record = CsvRecord::new().with("a,b", 1i64);
        assert_eq!(encode(&[record]), "\"a,b\"\n1");
    }

    #[test]
    fn test_scalar_coercion() {
        let record = CsvRecord::new()
            .with("empty", CsvValue::Empty)
            .with("missing", None::<i64>)
            .with("whole", 2.0f64)
            .with("fraction", 1.5f64);
        assert_eq!(encode(&[record]), "empty,missing,whole,fraction\n,,2,1.5");
    }

    #[test]
    fn test_missing_key_in_later_record() {
        let partial = CsvRecord::new().with("ID", 3i64);
        let csv = encode(&[pen(), partial]);
        assert_eq!(csv.lines().last(), Some("3,,,"));
    }

    #[test]
    fn test_no_trailing_newline() {
        assert!(!encode(&[pen(), pen()]).ends_with('\n'));
    }
}
