//! 表示用フォーマット
//!
//! 価格（日本円）と日時の整形

use chrono::{DateTime, TimeZone, Utc};

/// ja-JP ロケールでの JPY 通貨記号（全角）
pub const YEN_SIGN: char = '￥';

/// 価格を日本円の通貨表記に整形する (例: 1000 -> ￥1,000)
///
/// 小数点以下は四捨五入（0 から遠い方向）。
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return String::new();
    }

    let rounded = price.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{}{}", YEN_SIGN, grouped)
    } else {
        format!("{}{}", YEN_SIGN, grouped)
    }
}

/// 日時を指定タイムゾーンで `YYYY/MM/DD HH:MM` に整形する
pub fn format_timestamp<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant
        .with_timezone(tz)
        .format("%Y/%m/%d %H:%M")
        .to_string()
}

/// エクスポートファイル名用のタイムスタンプ `YYYYMMDDHHMMSS`
pub fn file_timestamp<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.format("%Y%m%d%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_price_grouping() {
        assert_eq!(format_price(1000.0), "￥1,000");
        assert_eq!(format_price(0.0), "￥0");
        assert_eq!(format_price(999.0), "￥999");
        assert_eq!(format_price(1234567.0), "￥1,234,567");
    }

    #[test]
    fn test_format_price_rounding() {
        assert_eq!(format_price(99.5), "￥100");
        assert_eq!(format_price(99.4), "￥99");
        assert_eq!(format_price(-1500.0), "-￥1,500");
    }

    #[test]
    fn test_format_price_non_finite() {
        assert_eq!(format_price(f64::NAN), "");
    }

    #[test]
    fn test_format_timestamp_fixed_offset() {
        let instant = DateTime::parse_from_rfc3339("2024-03-05T09:07:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(format_timestamp(&instant, &tokyo), "2024/03/05 18:07");

        assert_eq!(format_timestamp(&instant, &Utc), "2024/03/05 09:07");

        let honolulu = FixedOffset::west_opt(10 * 3600).unwrap();
        assert_eq!(format_timestamp(&instant, &honolulu), "2024/03/04 23:07");
    }

    #[test]
    fn test_file_timestamp() {
        let instant = DateTime::parse_from_rfc3339("2024-01-02T03:04:05+09:00").unwrap();
        assert_eq!(file_timestamp(&instant), "20240102030405");
    }
}
