//! Kelly command implementation

use super::OutputFormat;
use crate::config::Config;
use crate::market::{Market, MarketLeg};
use crate::risk::{
    closing_line_value, compute_betting_intelligence, BettingIntelligence, ClvReport, KellyOptions,
    ThreeWayOdds, ThreeWayProbs,
};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct KellyArgs {
    /// Model probability of the outcome
    #[arg(long)]
    pub prob: Decimal,

    /// Decimal odds on offer
    #[arg(long)]
    pub odds: Decimal,

    /// Bankroll to size against
    #[arg(long, default_value = "1000")]
    pub bankroll: Decimal,

    /// Market type (1X2, TOTALS, BTTS, DNB)
    #[arg(long, default_value = "1X2")]
    pub market_type: String,

    /// Market subtype (HOME, OVER, YES, ...)
    #[arg(long, default_value = "HOME")]
    pub subtype: String,

    /// Totals line
    #[arg(long)]
    pub line: Option<Decimal>,

    /// Kelly multiplier (overrides config)
    #[arg(long)]
    pub kelly_fraction: Option<Decimal>,

    /// Stake ceiling as a share of bankroll (overrides config)
    #[arg(long)]
    pub max_stake_pct: Option<Decimal>,

    /// Model home,draw,away probabilities for CLV
    #[arg(long, value_delimiter = ',', requires = "closing")]
    pub consensus: Option<Vec<Decimal>>,

    /// Closing home,draw,away decimal odds for CLV
    #[arg(long, value_delimiter = ',', requires = "consensus")]
    pub closing: Option<Vec<Decimal>>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct KellyOutput {
    market: String,
    intelligence: BettingIntelligence,
    #[serde(skip_serializing_if = "Option::is_none")]
    closing_line_value: Option<ClvReport>,
}

impl KellyArgs {
    pub fn options(&self, base: &KellyOptions) -> KellyOptions {
        KellyOptions {
            kelly_fraction: self.kelly_fraction.or(base.kelly_fraction),
            max_stake_pct: self.max_stake_pct.or(base.max_stake_pct),
            ..base.clone()
        }
    }

    fn clv(&self) -> anyhow::Result<Option<ClvReport>> {
        let (consensus, closing) = match (self.consensus.as_deref(), self.closing.as_deref()) {
            (Some(consensus), Some(closing)) => (consensus, closing),
            _ => return Ok(None),
        };

        let (&[home, draw, away], &[h, d, a]) = (consensus, closing) else {
            anyhow::bail!(
                "--consensus and --closing take home,draw,away values, got {} and {}",
                consensus.len(),
                closing.len()
            );
        };

        let report = closing_line_value(
            ThreeWayProbs { home, draw, away },
            ThreeWayOdds {
                home: h,
                draw: d,
                away: a,
            },
        )
        .ok_or_else(|| {
            anyhow::anyhow!("closing odds must be above 1.0 and probabilities within [0, 1]")
        })?;

        Ok(Some(report))
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let market = Market::from_parts(&self.market_type, &self.subtype, self.line)?;
        let leg = MarketLeg::new("cli", market, self.prob, self.odds);

        let output = KellyOutput {
            market: market.to_string(),
            intelligence: compute_betting_intelligence(
                &leg,
                self.bankroll,
                &self.options(&config.kelly),
            )?,
            closing_line_value: self.clv()?,
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
            OutputFormat::Table => print_table(&output),
        }

        Ok(())
    }
}

fn print_table(output: &KellyOutput) {
    println!("Market: {}", output.market);
    match &output.intelligence {
        BettingIntelligence::Available(stake) => {
            println!("  Edge:              {:+.4}", stake.edge);
            println!("  Full Kelly:        {:.4}", stake.full_kelly);
            println!("  Fractional Kelly:  {:.4}", stake.fractional_kelly);
            println!(
                "  Recommended stake: {:.2}%{}",
                stake.recommended_stake_pct * Decimal::ONE_HUNDRED,
                if stake.capped { " (capped)" } else { "" }
            );
            println!("  Bankroll stake:    {:.2}", stake.bankroll_stake);
            println!("  Expected value:    {:.2}", stake.expected_value);
            println!("  Recommendation:    {}", stake.recommendation);
        }
        BettingIntelligence::NotAvailable { reason } => {
            println!("  Not available: {}", reason);
        }
    }

    if let Some(clv) = &output.closing_line_value {
        println!("Closing line value (margin {:.2}%):", clv.margin * Decimal::ONE_HUNDRED);
        for outcome in &clv.outcomes {
            println!(
                "  {:<5} model {:.3}  close {:.3}  clv {:+.3}  fair clv {:+.3}",
                outcome.outcome.as_str(),
                outcome.consensus_prob,
                outcome.closing_implied_prob,
                outcome.clv,
                outcome.fair_clv
            );
        }
    }
}
