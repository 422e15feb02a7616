//! 稠密矩陣與矩陣運算
//!
//! 矩陣是「列鍵 → 欄鍵 → 數值」的二層映射。列/欄鍵依首次出現順序保存，
//! 且矩陣永遠是完整的：每個宣告的列都擁有每個宣告的欄，預設為 0。
//! 所有二元運算都以鍵比對，不以位置配對。
//! 算術一律檢查溢位，超出 `Decimal` 範圍時回報 `InvalidValue`。

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::record::Record;
use crate::{PlanError, Result};

/// 稠密矩陣
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: Vec<String>,
    columns: Vec<String>,
    cells: HashMap<String, HashMap<String, Decimal>>,
}

impl Matrix {
    /// [`Matrix::sum_columns`] 結果的唯一列鍵
    pub const TOTAL_ROW: &'static str = "total";

    /// 建立指定列/欄、全部為 0 的矩陣（重複鍵只保留第一次）
    pub fn zeros<R, C>(rows: R, columns: C) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut matrix = Matrix::default();
        for column in columns {
            matrix.declare_column(column.into());
        }
        for row in rows {
            matrix.declare_row(row.into());
        }
        matrix
    }

    /// 由紀錄集合建立矩陣
    ///
    /// 列/欄鍵取自 `row_field`/`col_field` 的相異值（首次出現順序），
    /// 每格先補 0，再把 `value_field` 加總進對應的格子。
    pub fn build(records: &[Record], row_field: &str, col_field: &str, value_field: &str) -> Result<Self> {
        Matrix::default().accumulate(records, row_field, col_field, value_field)
    }

    /// 把紀錄加總進既有矩陣；新出現的列/欄會被宣告並補 0
    pub fn accumulate(
        mut self,
        records: &[Record],
        row_field: &str,
        col_field: &str,
        value_field: &str,
    ) -> Result<Self> {
        for record in records {
            let field = |name: &str| {
                record.get(name).ok_or_else(|| {
                    PlanError::InvalidValue(format!("紀錄 {} 缺少欄位 {}", record.key, name))
                })
            };

            let row = field(row_field)?.as_key();
            let column = field(col_field)?.as_key();
            let value = field(value_field)?.as_number().ok_or_else(|| {
                PlanError::InvalidValue(format!(
                    "紀錄 {} 的欄位 {} 不是數值",
                    record.key, value_field
                ))
            })?;

            self.declare_row(row.clone());
            self.declare_column(column.clone());
            if let Some(cell) = self.cells.get_mut(&row).and_then(|r| r.get_mut(&column)) {
                *cell = cell
                    .checked_add(value)
                    .ok_or_else(|| overflow("accumulate", &row, &column))?;
            }
        }

        Ok(self)
    }

    /// 由（列, [(欄, 值)]）建立矩陣，未給的格子為 0
    pub fn from_rows<S: Into<String>>(rows: Vec<(S, Vec<(S, Decimal)>)>) -> Self {
        let mut matrix = Matrix::default();
        for (row, values) in rows {
            let row = row.into();
            matrix.declare_row(row.clone());
            for (column, value) in values {
                matrix.set(&row, column, value);
            }
        }
        matrix
    }

    fn declare_row(&mut self, row: String) {
        if self.cells.contains_key(&row) {
            return;
        }
        let values = self
            .columns
            .iter()
            .map(|c| (c.clone(), Decimal::ZERO))
            .collect();
        self.cells.insert(row.clone(), values);
        self.rows.push(row);
    }

    fn declare_column(&mut self, column: String) {
        if self.columns.contains(&column) {
            return;
        }
        for values in self.cells.values_mut() {
            values.insert(column.clone(), Decimal::ZERO);
        }
        self.columns.push(column);
    }

    /// 設定一格的值；列或欄不存在時先宣告
    pub fn set(&mut self, row: &str, column: impl Into<String>, value: Decimal) {
        let column = column.into();
        self.declare_row(row.to_string());
        self.declare_column(column.clone());
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(&column)) {
            *cell = value;
        }
    }

    /// 列鍵（首次出現順序）
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// 欄鍵（首次出現順序）
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, row: &str, column: &str) -> Option<Decimal> {
        self.cells.get(row).and_then(|r| r.get(column)).copied()
    }

    pub fn row(&self, row: &str) -> Option<&HashMap<String, Decimal>> {
        self.cells.get(row)
    }

    pub fn has_row(&self, row: &str) -> bool {
        self.cells.contains_key(row)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// 每個宣告的列都擁有每個宣告的欄
    pub fn is_complete(&self) -> bool {
        self.rows.len() == self.cells.len()
            && self.rows.iter().all(|r| {
                self.cells
                    .get(r)
                    .map(|values| {
                        values.len() == self.columns.len()
                            && self.columns.iter().all(|c| values.contains_key(c))
                    })
                    .unwrap_or(false)
            })
    }

    /// 所有格子的總和
    pub fn total(&self) -> Result<Decimal> {
        self.rows.iter().try_fold(Decimal::ZERO, |sum, row| {
            self.columns.iter().try_fold(sum, |sum, column| {
                sum.checked_add(self.cell(row, column))
                    .ok_or_else(|| overflow("total", row, column))
            })
        })
    }

    fn cell(&self, row: &str, column: &str) -> Decimal {
        self.get(row, column).unwrap_or(Decimal::ZERO)
    }

    fn try_map_cells<F>(&self, f: F) -> Result<Matrix>
    where
        F: Fn(&str, &str, Decimal) -> Result<Decimal>,
    {
        let mut result = Matrix::zeros(self.rows.iter().cloned(), self.columns.iter().cloned());
        for row in &self.rows {
            for column in &self.columns {
                let value = f(row, column, self.cell(row, column))?;
                result.set(row, column.clone(), value);
            }
        }
        Ok(result)
    }

    fn ensure_same_shape(&self, other: &Matrix, operation: &str) -> Result<()> {
        if !same_keys(&self.rows, &other.rows) {
            return Err(PlanError::dimension(
                operation,
                format!("列鍵不同（{} 列 vs {} 列）", self.rows.len(), other.rows.len()),
            ));
        }
        if !same_keys(&self.columns, &other.columns) {
            return Err(PlanError::dimension(
                operation,
                format!("欄鍵不同（{} 欄 vs {} 欄）", self.columns.len(), other.columns.len()),
            ));
        }
        Ok(())
    }

    /// 矩陣乘法
    ///
    /// `self` 的欄鍵集合必須等於 `other` 的列鍵集合。乘積的列為 `self` 的列，
    /// 欄為 `other` 的欄；每格為共用鍵上的內積。
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.columns.len() != other.rows.len() {
            return Err(PlanError::dimension(
                "multiply",
                format!(
                    "左矩陣 {} 欄，右矩陣 {} 列",
                    self.columns.len(),
                    other.rows.len()
                ),
            ));
        }
        if let Some(missing) = self.columns.iter().find(|k| !other.has_row(k)) {
            return Err(PlanError::dimension(
                "multiply",
                format!("右矩陣缺少列 {}", missing),
            ));
        }

        let mut product = Matrix::zeros(self.rows.iter().cloned(), other.columns.iter().cloned());
        for row in &self.rows {
            for column in &other.columns {
                let value = self.columns.iter().try_fold(Decimal::ZERO, |sum, key| {
                    self.cell(row, key)
                        .checked_mul(other.cell(key, column))
                        .and_then(|term| sum.checked_add(term))
                        .ok_or_else(|| overflow("multiply", row, column))
                })?;
                product.set(row, column.clone(), value);
            }
        }

        Ok(product)
    }

    /// 逐格相減
    pub fn subtract(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_same_shape(other, "subtract")?;
        self.try_map_cells(|row, column, value| {
            value
                .checked_sub(other.cell(row, column))
                .ok_or_else(|| overflow("subtract", row, column))
        })
    }

    /// 逐格相除；除數為 0 時回報 `UndefinedStatistic`
    pub fn elementwise_divide(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_same_shape(other, "elementwise_divide")?;
        self.try_map_cells(|row, column, value| {
            let divisor = other.cell(row, column);
            value.checked_div(divisor).ok_or_else(|| {
                PlanError::UndefinedStatistic(format!(
                    "({}, {}) 除數為 {}",
                    row, column, divisor
                ))
            })
        })
    }

    /// 每格乘以常數
    pub fn scalar_multiply(&self, factor: Decimal) -> Result<Matrix> {
        self.try_map_cells(|row, column, value| {
            value
                .checked_mul(factor)
                .ok_or_else(|| overflow("scalar_multiply", row, column))
        })
    }

    /// 每格加上常數
    pub fn scalar_add(&self, addend: Decimal) -> Result<Matrix> {
        self.try_map_cells(|row, column, value| {
            value
                .checked_add(addend)
                .ok_or_else(|| overflow("scalar_add", row, column))
        })
    }

    /// 每格取整數次方
    pub fn power(&self, exponent: i64) -> Result<Matrix> {
        self.try_map_cells(|row, column, value| {
            value.checked_powi(exponent).ok_or_else(|| {
                PlanError::InvalidValue(format!(
                    "({}, {}) 的 {} 次方無法表示",
                    row, column, exponent
                ))
            })
        })
    }

    /// 欄加總：回傳只有一列（[`Matrix::TOTAL_ROW`]）的矩陣
    pub fn sum_columns(&self) -> Result<Matrix> {
        let mut totals = Matrix::zeros([Self::TOTAL_ROW], self.columns.iter().cloned());
        for column in &self.columns {
            let sum = self.rows.iter().try_fold(Decimal::ZERO, |sum, row| {
                sum.checked_add(self.cell(row, column))
                    .ok_or_else(|| overflow("sum_columns", row, column))
            })?;
            totals.set(Self::TOTAL_ROW, column.clone(), sum);
        }
        Ok(totals)
    }

    /// 多個同形矩陣逐格相加；空清單回傳空矩陣
    pub fn add(matrices: &[Matrix]) -> Result<Matrix> {
        let Some((first, rest)) = matrices.split_first() else {
            return Ok(Matrix::default());
        };

        let mut sum = first.clone();
        for matrix in rest {
            sum.ensure_same_shape(matrix, "add")?;
            sum = sum.try_map_cells(|row, column, value| {
                value
                    .checked_add(matrix.cell(row, column))
                    .ok_or_else(|| overflow("add", row, column))
            })?;
        }
        Ok(sum)
    }

    /// 只保留指定列（依給定順序）；原本沒有的列補 0
    pub fn restrict_rows(&self, rows: &[String]) -> Matrix {
        let mut restricted = Matrix::zeros(rows.iter().cloned(), self.columns.iter().cloned());
        for row in rows {
            if let Some(values) = self.cells.get(row) {
                for (column, value) in values {
                    restricted.set(row, column.clone(), *value);
                }
            }
        }
        restricted
    }

    /// 轉置
    pub fn transpose(&self) -> Matrix {
        let mut transposed = Matrix::zeros(self.columns.iter().cloned(), self.rows.iter().cloned());
        for row in &self.rows {
            for column in &self.columns {
                transposed.set(column, row.clone(), self.cell(row, column));
            }
        }
        transposed
    }
}

fn overflow(operation: &str, row: &str, column: &str) -> PlanError {
    PlanError::InvalidValue(format!("{} 在 ({}, {}) 超出數值範圍", operation, row, column))
}

fn same_keys(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let set: HashSet<&String> = a.iter().collect();
    b.iter().all(|k| set.contains(k))
}
