//! 標準常態反函數（查表 + 線性內插）
//!
//! 查表涵蓋 1e-9 到 1 − 1e-9，中段每 0.01 一格，兩端加密；z 值取到小數兩位。
//! 表中已有的機率直接回傳表列 z 值，其餘在相鄰兩格間線性內插。
//!
//! 這是近似值而非精確的反誤差函數。與精確值相比的最大誤差：
//! - p ∈ [0.01, 0.99]：約 0.009
//! - p ∈ [0.001, 0.999]：約 0.031
//! - 更外側的尾端：最多約 0.14
//!
//! 小於 1e-9 或大於 1 − 1e-9 的機率取表頭/表尾的 z 值。

use horizon_core::{PlanError, Result};
use rust_decimal::Decimal;
use std::sync::OnceLock;

/// (機率尾數, 機率小數位數, z × 100)
const NORM_TABLE: &[(i64, u32, i64)] = &[
    (1, 9, -600),
    (1, 8, -561),
    (1, 7, -520),
    (1, 6, -475),
    (1, 5, -426),
    (1, 4, -372),
    (5, 4, -329),
    (1, 3, -309),
    (25, 4, -281),
    (5, 3, -258),
    (75, 4, -243),
    (1, 2, -233),
    (15, 3, -217),
    (2, 2, -205),
    (25, 3, -196),
    (3, 2, -188),
    (35, 3, -181),
    (4, 2, -175),
    (45, 3, -170),
    (5, 2, -164),
    (6, 2, -155),
    (7, 2, -148),
    (8, 2, -141),
    (9, 2, -134),
    (1, 1, -128),
    (11, 2, -123),
    (12, 2, -117),
    (13, 2, -113),
    (14, 2, -108),
    (15, 2, -104),
    (16, 2, -99),
    (17, 2, -95),
    (18, 2, -92),
    (19, 2, -88),
    (2, 1, -84),
    (21, 2, -81),
    (22, 2, -77),
    (23, 2, -74),
    (24, 2, -71),
    (25, 2, -67),
    (26, 2, -64),
    (27, 2, -61),
    (28, 2, -58),
    (29, 2, -55),
    (3, 1, -52),
    (31, 2, -50),
    (32, 2, -47),
    (33, 2, -44),
    (34, 2, -41),
    (35, 2, -39),
    (36, 2, -36),
    (37, 2, -33),
    (38, 2, -31),
    (39, 2, -28),
    (4, 1, -25),
    (41, 2, -23),
    (42, 2, -20),
    (43, 2, -18),
    (44, 2, -15),
    (45, 2, -13),
    (46, 2, -10),
    (47, 2, -8),
    (48, 2, -5),
    (49, 2, -3),
    (5, 1, 0),
    (51, 2, 3),
    (52, 2, 5),
    (53, 2, 8),
    (54, 2, 10),
    (55, 2, 13),
    (56, 2, 15),
    (57, 2, 18),
    (58, 2, 20),
    (59, 2, 23),
    (6, 1, 25),
    (61, 2, 28),
    (62, 2, 31),
    (63, 2, 33),
    (64, 2, 36),
    (65, 2, 39),
    (66, 2, 41),
    (67, 2, 44),
    (68, 2, 47),
    (69, 2, 50),
    (7, 1, 52),
    (71, 2, 55),
    (72, 2, 58),
    (73, 2, 61),
    (74, 2, 64),
    (75, 2, 67),
    (76, 2, 71),
    (77, 2, 74),
    (78, 2, 77),
    (79, 2, 81),
    (8, 1, 84),
    (81, 2, 88),
    (82, 2, 92),
    (83, 2, 95),
    (84, 2, 99),
    (85, 2, 104),
    (86, 2, 108),
    (87, 2, 113),
    (88, 2, 117),
    (89, 2, 123),
    (9, 1, 128),
    (91, 2, 134),
    (92, 2, 141),
    (93, 2, 148),
    (94, 2, 155),
    (95, 2, 164),
    (955, 3, 170),
    (96, 2, 175),
    (965, 3, 181),
    (97, 2, 188),
    (975, 3, 196),
    (98, 2, 205),
    (985, 3, 217),
    (99, 2, 233),
    (9925, 4, 243),
    (995, 3, 258),
    (9975, 4, 281),
    (999, 3, 309),
    (9995, 4, 329),
    (9999, 4, 372),
    (99999, 5, 426),
    (999999, 6, 475),
    (9999999, 7, 520),
    (99999999, 8, 561),
    (999999999, 9, 600),
];

fn table() -> &'static [(Decimal, Decimal)] {
    static TABLE: OnceLock<Vec<(Decimal, Decimal)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        NORM_TABLE
            .iter()
            .map(|&(mantissa, scale, z)| (Decimal::new(mantissa, scale), Decimal::new(z, 2)))
            .collect()
    })
}

/// 累積機率 → 標準常態 z 值
pub fn norm_inverse(p: Decimal) -> Result<Decimal> {
    if p <= Decimal::ZERO || p >= Decimal::ONE {
        return Err(PlanError::UndefinedStatistic(format!(
            "機率必須介於 0 與 1 之間: {}",
            p
        )));
    }

    let table = table();
    match table.binary_search_by(|(key, _)| key.cmp(&p)) {
        Ok(index) => Ok(table[index].1),
        Err(0) => Ok(table[0].1),
        Err(index) if index == table.len() => Ok(table[table.len() - 1].1),
        Err(index) => {
            let (p0, z0) = table[index - 1];
            let (p1, z1) = table[index];
            Ok(z0 + (p - p0) / (p1 - p0) * (z1 - z0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("0.5", "0.00")]
    #[case("0.985", "2.17")]
    #[case("0.95", "1.64")]
    #[case("0.05", "-1.64")]
    #[case("0.99", "2.33")]
    #[case("0.000000001", "-6.00")]
    #[case("0.999999999", "6.00")]
    fn test_exact_table_hits(#[case] p: &str, #[case] z: &str) {
        assert_eq!(norm_inverse(dec(p)).unwrap(), dec(z));
    }

    #[test]
    fn test_linear_interpolation_between_keys() {
        // 0.985 → 2.17，0.99 → 2.33，中點為 2.25
        assert_eq!(norm_inverse(dec("0.9875")).unwrap(), dec("2.25"));

        // 0.50 → 0.00，0.51 → 0.03，四分之一處為 0.0075
        assert_eq!(norm_inverse(dec("0.5025")).unwrap(), dec("0.0075"));
    }

    #[test]
    fn test_table_is_sorted_and_monotone() {
        let table = table();
        assert!(table.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 <= w[1].1));
        assert_eq!(table.first().map(|r| r.0), Some(dec("0.000000001")));
    }

    #[test]
    fn test_symmetry() {
        for p in ["0.01", "0.2", "0.37", "0.0025"] {
            let low = norm_inverse(dec(p)).unwrap();
            let high = norm_inverse(Decimal::ONE - dec(p)).unwrap();
            assert_eq!(low, -high, "p = {}", p);
        }
    }

    #[test]
    fn test_extreme_tails_clamp() {
        assert_eq!(norm_inverse(dec("0.0000000001")).unwrap(), dec("-6.00"));
        assert_eq!(norm_inverse(dec("0.9999999999")).unwrap(), dec("6.00"));
    }

    #[rstest]
    #[case("0")]
    #[case("1")]
    #[case("-0.2")]
    #[case("1.5")]
    fn test_out_of_range(#[case] p: &str) {
        assert!(matches!(
            norm_inverse(dec(p)),
            Err(PlanError::UndefinedStatistic(_))
        ));
    }
}
