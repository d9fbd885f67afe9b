//! 一覧表の列構成
//!
//! 端末の幅に応じて表示列と列幅 (%) を切り替える

/// 幅の段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthTier {
    Mobile,
    Tablet,
    Desktop,
}

impl WidthTier {
    pub const TABLET_MIN_COLS: u16 = 80;
    pub const DESKTOP_MIN_COLS: u16 = 120;

    pub fn from_width(cols: u16) -> Self {
        if cols < Self::TABLET_MIN_COLS {
            WidthTier::Mobile
        } else if cols < Self::DESKTOP_MIN_COLS {
            WidthTier::Tablet
        } else {
            WidthTier::Desktop
        }
    }
}

/// 一覧表の列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Name,
    Sku,
    Price,
    Quantity,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
    Actions,
}

impl Column {
    pub fn title(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Name => "商品名",
            Column::Sku => "SKU",
            Column::Price => "価格",
            Column::Quantity => "在庫数",
            Column::UpdatedBy => "更新者",
            Column::CreatedAt => "作成日時",
            Column::UpdatedAt => "更新日時",
            Column::Actions => "操作",
        }
    }

    /// 数値列は右寄せ
    pub fn right_aligned(self) -> bool {
        matches!(self, Column::Price | Column::Quantity | Column::Actions)
    }
}

/// 表示する列と幅 (%)。合計は 100
pub fn columns(tier: WidthTier) -> &'static [(Column, u16)] {
    match tier {
        WidthTier::Mobile => &[
            (Column::Id, 8),
            (Column::Name, 32),
            (Column::Price, 20),
            (Column::Quantity, 15),
            (Column::UpdatedAt, 17),
            (Column::Actions, 8),
        ],
        WidthTier::Tablet => &[
            (Column::Id, 6),
            (Column::Name, 22),
            (Column::Sku, 12),
            (Column::Price, 14),
            (Column::Quantity, 10),
            (Column::UpdatedBy, 9),
            (Column::CreatedAt, 12),
            (Column::UpdatedAt, 9),
            (Column::Actions, 6),
        ],
        WidthTier::Desktop => &[
            (Column::Id, 6),
            (Column::Name, 22),
            (Column::Sku, 12),
            (Column::Price, 12),
            (Column::Quantity, 10),
            (Column::UpdatedBy, 10),
            (Column::CreatedAt, 12),
            (Column::UpdatedAt, 10),
            (Column::Actions, 6),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has(tier: WidthTier, column: Column) -> bool {
        columns(tier).iter().any(|(c, _)| *c == column)
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(WidthTier::from_width(40), WidthTier::Mobile);
        assert_eq!(WidthTier::from_width(79), WidthTier::Mobile);
        assert_eq!(WidthTier::from_width(80), WidthTier::Tablet);
        assert_eq!(WidthTier::from_width(119), WidthTier::Tablet);
        assert_eq!(WidthTier::from_width(120), WidthTier::Desktop);
    }

    #[test]
    fn test_mobile_hides_secondary_columns() {
        for column in [Column::Sku, Column::UpdatedBy, Column::CreatedAt] {
            assert!(!has(WidthTier::Mobile, column));
            assert!(has(WidthTier::Tablet, column));
            assert!(has(WidthTier::Desktop, column));
        }

        let mobile: Vec<Column> = columns(WidthTier::Mobile).iter().map(|(c, _)| *c).collect();
        assert_eq!(
            mobile,
            vec![
                Column::Id,
                Column::Name,
                Column::Price,
                Column::Quantity,
                Column::UpdatedAt,
                Column::Actions
            ]
        );
    }

    #[test]
    fn test_widths_fit_table() {
        for tier in [WidthTier::Mobile, WidthTier::Tablet, WidthTier::Desktop] {
            let total: u16 = columns(tier).iter().map(|(_, w)| w).sum();
            assert!(total <= 100, "{:?} sums to {}", tier, total);
            assert!(has(tier, Column::Actions));
        }
    }
}
