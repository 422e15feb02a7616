//! 水平計劃產生
//!
//! 每個物料獨立計算：先決定安全庫存與週期庫存（整段期間固定），
//! 再依日曆順序逐期推算期初、生產與期末庫存。

use horizon_core::{
    Calendar, HorizontalPlan, Item, Matrix, PeriodRecord, PlanError, PlanningConfig,
    PlanningStrategy, Result, SafetyStockPolicy,
};
use rayon::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// 物料的庫存水位（各期相同）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StockLevels {
    pub safety_stock: Decimal,
    pub cycle_stock: Decimal,
}

impl StockLevels {
    pub fn new(safety_stock: Decimal, cycle_stock: Decimal) -> Self {
        Self {
            safety_stock,
            cycle_stock,
        }
    }

    /// 目標總庫存 = 安全庫存 + 週期庫存
    pub fn total(&self) -> Decimal {
        self.safety_stock + self.cycle_stock
    }
}

/// 水平計劃產生器
pub struct HorizontalPlanGenerator<'a> {
    config: &'a PlanningConfig,
}

impl<'a> HorizontalPlanGenerator<'a> {
    pub fn new(config: &'a PlanningConfig) -> Self {
        Self { config }
    }

    /// 預測量最高的期間
    ///
    /// 依日曆順序掃描，只有嚴格大於目前最大值才替換，
    /// 同值時取最先出現的期間。日曆為空時回傳 `None`。
    pub fn max_forecast_period(
        item_id: &str,
        calendar: &Calendar,
        forecast: &Matrix,
    ) -> Option<(String, Decimal)> {
        let mut best: Option<(String, Decimal)> = None;
        for period in calendar.periods() {
            let qty = forecast
                .get(item_id, &period.period_id)
                .unwrap_or(Decimal::ZERO);
            let replace = match &best {
                Some((_, max)) => qty > *max,
                None => true,
            };
            if replace {
                best = Some((period.period_id.clone(), qty));
            }
        }
        best
    }

    /// 週期庫存 = round(FOQ × 係數)；非回應型策略為 0
    pub fn cycle_stock(&self, item: &Item) -> Result<Decimal> {
        if !item.strategy.is_reactive() {
            return Ok(Decimal::ZERO);
        }
        item.fixed_order_qty
            .checked_mul(self.config.cycle_stock_factor)
            .map(round)
            .ok_or_else(|| {
                PlanError::InvalidValue(format!("物料 {} 的週期庫存超出數值範圍", item.item_id))
            })
    }

    /// 依日產出率決定庫存水位
    ///
    /// 安全庫存 = round(最高期預測 / 該期天數 × 覆蓋天數)，
    /// ReactiveFast 覆蓋 8 天、ReactiveSlow 覆蓋 20 天，其他策略為 0。
    pub fn run_rate_levels(&self, item: &Item, calendar: &Calendar, forecast: &Matrix) -> Result<StockLevels> {
        let coverage = match item.strategy {
            PlanningStrategy::ReactiveFast => self.config.fast_coverage_days,
            PlanningStrategy::ReactiveSlow => self.config.slow_coverage_days,
            PlanningStrategy::None => return Ok(StockLevels::default()),
        };

        let Some((max_period, max_forecast)) =
            Self::max_forecast_period(&item.item_id, calendar, forecast)
        else {
            return Ok(StockLevels::new(Decimal::ZERO, self.cycle_stock(item)?));
        };

        let days = calendar.days(&max_period)?;
        if days == 0 {
            return Err(PlanError::UndefinedStatistic(format!(
                "期間 {} 天數為 0，無法計算日產出率",
                max_period
            )));
        }

        let daily_rate = max_forecast / Decimal::from(days);
        let safety_stock = daily_rate.checked_mul(coverage).ok_or_else(|| {
            PlanError::InvalidValue(format!("物料 {} 的安全庫存超出數值範圍", item.item_id))
        })?;
        Ok(StockLevels::new(round(safety_stock), self.cycle_stock(item)?))
    }

    /// 依配置的政策決定庫存水位
    ///
    /// `statistical` 為統計公式推算的安全庫存；只有 `Statistical` 政策會使用。
    pub fn resolve_levels(
        &self,
        item: &Item,
        calendar: &Calendar,
        forecast: &Matrix,
        statistical: Option<Decimal>,
    ) -> Result<StockLevels> {
        match self.config.safety_stock_policy {
            SafetyStockPolicy::RunRate => self.run_rate_levels(item, calendar, forecast),
            SafetyStockPolicy::Statistical => {
                if !item.strategy.is_reactive() {
                    return Ok(StockLevels::default());
                }
                let safety_stock = statistical
                    .ok_or_else(|| PlanError::StatisticsNotFound(item.item_id.clone()))?;
                Ok(StockLevels::new(round(safety_stock), self.cycle_stock(item)?))
            }
        }
    }

    /// 逐期推算
    ///
    /// - 期初[0] = 現有庫存；期初[i] = 期末[i−1]
    /// - 生產[i] = max(0, 目標總庫存 + 預測[i] − 期初[i])
    /// - 期末[i] = 期初[i] − 預測[i] + 生產[i]
    pub fn rollforward(
        item: &Item,
        calendar: &Calendar,
        forecast: &Matrix,
        levels: StockLevels,
    ) -> HorizontalPlan {
        let mut plan = HorizontalPlan::new(item.item_id.clone(), calendar.period_ids());
        let total_inventory = levels.total();
        let mut beginning = item.on_hand_qty;

        for (position, period) in calendar.periods().iter().enumerate() {
            let sales_forecast = forecast
                .get(&item.item_id, &period.period_id)
                .unwrap_or(Decimal::ZERO);
            let production = (total_inventory + sales_forecast - beginning).max(Decimal::ZERO);
            let ending = beginning - sales_forecast + production;

            plan.record_period(
                position,
                &PeriodRecord {
                    safety_stock: levels.safety_stock,
                    cycle_stock: levels.cycle_stock,
                    level_load: Decimal::ZERO,
                    total_inventory,
                    beginning_inventory: beginning,
                    sales_forecast,
                    production,
                    ending_inventory: ending,
                },
            );

            beginning = ending;
        }

        plan
    }

    /// 產生單一物料的水平計劃
    pub fn generate(
        &self,
        item: &Item,
        calendar: &Calendar,
        forecast: &Matrix,
        statistical: Option<Decimal>,
    ) -> Result<(HorizontalPlan, StockLevels)> {
        let levels = self.resolve_levels(item, calendar, forecast, statistical)?;
        Ok((Self::rollforward(item, calendar, forecast, levels), levels))
    }

    /// 產生全部物料的水平計劃（結果順序與 `items` 相同）
    pub fn generate_all(
        &self,
        items: &[Item],
        calendar: &Calendar,
        forecast: &Matrix,
        statistical: &HashMap<String, Decimal>,
    ) -> Vec<(String, Result<(HorizontalPlan, StockLevels)>)> {
        let plan_item = |item: &Item| {
            let stat = statistical.get(&item.item_id).copied();
            (
                item.item_id.clone(),
                self.generate(item, calendar, forecast, stat),
            )
        };

        if self.config.parallel {
            items.par_iter().map(plan_item).collect()
        } else {
            items.iter().map(plan_item).collect()
        }
    }
}

/// 四捨五入到整數（.5 遠離 0）
fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
