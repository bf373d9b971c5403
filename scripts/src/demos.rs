//! Demo scenarios.
//!
//! A scenario is a fixed sequence of flows. Every step is isolated: its error
//! is logged and printed, then the scenario moves on to the next step. Only
//! steps that depend on an earlier result (e.g. polling a swap that never got
//! an order id) are skipped.

use std::fmt::Display;

use encifher_client::{DefiApi, Token};
use encifher_keypair::Keypair;
use log::error;
use solana_sdk::pubkey::Pubkey;

use crate::chain::ChainSubmitter;
use crate::flows::Session;
use crate::output::{
    print_error, print_header, print_info, print_json, print_success, print_waiting,
};

/// What happened to each step of a scenario.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub steps: Vec<(&'static str, bool)>,
}

impl ScenarioReport {
    /// Log and print a step's result, then hand the value on if there is one.
    pub fn record<T, E: Display>(&mut self, step: &'static str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => {
                self.steps.push((step, true));
                Some(value)
            }
            Err(e) => {
                error!("{} failed: {:#}", step, e);
                print_error(&format!("{} failed: {}", step, e));
                self.steps.push((step, false));
                None
            }
        }
    }

    pub fn attempted(&self, step: &str) -> bool {
        self.steps.iter().any(|(s, _)| *s == step)
    }

    pub fn succeeded(&self, step: &str) -> bool {
        self.steps.iter().any(|(s, ok)| *s == step && *ok)
    }

    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(|(_, ok)| *ok)
    }

    pub fn print_summary(&self) {
        println!("\n📋 Summary:");
        for (step, ok) in &self.steps {
            println!("  {} {}", if *ok { "✅" } else { "❌" }, step);
        }
    }
}

/// "100000" of a 6-decimal token reads "0.1 (100000 base units)".
fn display_amount(token: &Token, amount: &str) -> String {
    match token.to_ui_amount(amount) {
        Ok(ui) => format!("{} ({} base units)", ui, amount),
        Err(_) => format!("{} base units", amount),
    }
}

fn mint_list(tokens: &[&Token]) -> Vec<String> {
    tokens.iter().map(|t| t.token_mint_address.clone()).collect()
}

async fn read_balance<A: DefiApi, C: ChainSubmitter>(
    session: &Session<A, C>,
    report: &mut ScenarioReport,
    step: &'static str,
    owner: &Keypair,
    mints: &[String],
) {
    print_waiting(&format!("Fetching balance of {}...", owner.pubkey()));
    if let Some(balance) = report.record(step, session.balance(owner, mints).await) {
        print_json(&format!("Balances of {}", owner.pubkey()), &balance);
    }
}

/// Deposit `amount` of `token`, wait, then read the token's balance.
pub async fn run_deposit<A: DefiApi, C: ChainSubmitter>(
    session: &Session<A, C>,
    token: &Token,
    amount: &str,
) -> ScenarioReport {
    let mut report = ScenarioReport::default();
    print_header("Deposit");
    print_info(&format!("User: {}", session.user.pubkey()));
    print_info(&format!("Token: {}", token.token_mint_address));
    print_info(&format!("Amount: {}", display_amount(token, amount)));

    print_waiting("Sending deposit transaction...");
    if let Some(sig) = report.record("deposit", session.deposit(token, amount).await) {
        print_success(&format!("Deposit successful: {}", sig));
    }

    session.settle().await;
    read_balance(session, &mut report, "balance", &session.user, &mint_list(&[token])).await;
    report
}

/// Withdraw `amount` of `token`, wait, then read the token's balance.
pub async fn run_withdraw<A: DefiApi, C: ChainSubmitter>(
    session: &Session<A, C>,
    token: &Token,
    amount: &str,
    receiver: Option<Pubkey>,
) -> ScenarioReport {
    let mut report = ScenarioReport::default();
    print_header("Withdraw");
    print_info(&format!("User: {}", session.user.pubkey()));
    print_info(&format!("Token: {}", token.token_mint_address));
    print_info(&format!("Amount: {}", display_amount(token, amount)));
    if let Some(receiver) = receiver {
        print_info(&format!("Receiver: {}", receiver));
    }

    print_waiting("Sending withdraw transaction...");
    if let Some(sig) = report.record("withdraw", session.withdraw(token, amount, receiver).await) {
        print_success(&format!("Withdraw successful: {}", sig));
    }

    session.settle().await;
    read_balance(session, &mut report, "balance", &session.user, &mint_list(&[token])).await;
    report
}

/// Quote, swap and poll; stops before the balance read if the swap never
/// reached the SDK.
pub async fn run_swap<A: DefiApi, C: ChainSubmitter>(
    session: &Session<A, C>,
    token_in: &Token,
    token_out: &Token,
    amount_in: &str,
) -> ScenarioReport {
    let mut report = ScenarioReport::default();
    print_header("Swap");
    print_info(&format!("Amount in: {}", display_amount(token_in, amount_in)));

    if swap_steps(session, &mut report, token_in, token_out, amount_in).await {
        read_balance(session, &mut report, "balance", &session.user, &mint_list(&[token_in, token_out]))
            .await;
    }
    report
}

/// Returns whether the swap was accepted by the SDK.
async fn swap_steps<A: DefiApi, C: ChainSubmitter>(
    session: &Session<A, C>,
    report: &mut ScenarioReport,
    token_in: &Token,
    token_out: &Token,
    amount_in: &str,
) -> bool {
    let params = session.swap_params(token_in, token_out, amount_in);

    if let Some(quote) = report.record("swap quote", session.quote(&params).await) {
        print_info(&format!("Swap quote: {}", quote));
    }

    print_waiting("Submitting swap and polling order status...");
    let Some(outcome) = report.record("swap", session.swap(&params).await) else {
        return false;
    };

    let status = outcome
        .poll
        .last_status
        .as_ref()
        .map(|s| s.status.to_string())
        .unwrap_or_else(|| "unknown".into());
    if outcome.poll.completed {
        print_success(&format!(
            "Order {} completed after {} attempt(s)",
            outcome.order_status_identifier, outcome.poll.attempts
        ));
    } else {
        print_info(&format!(
            "Order {} still {} after {} attempts",
            outcome.order_status_identifier, status, outcome.poll.attempts
        ));
    }
    true
}

/// List the user's mints, then read balances across all of them.
pub async fn run_fetch_balance<A: DefiApi, C: ChainSubmitter>(
    session: &Session<A, C>,
) -> ScenarioReport {
    let mut report = ScenarioReport::default();
    print_header("Fetch Balance");
    print_info(&format!("User: {}", session.user.pubkey()));

    let Some(mints) = report.record("token mints", session.user_token_mints().await) else {
        return report;
    };
    print_info(&format!("User token mints: {:?}", mints));

    read_balance(session, &mut report, "balance", &session.user, &mints).await;
    report
}

/// Sender balance, anonymous transfer, then the receiver's balance signed by
/// the receiver.
pub async fn run_anon_transfer<A: DefiApi, C: ChainSubmitter>(
    session: &Session<A, C>,
    receiver: &Keypair,
    token: &Token,
    amount: &str,
) -> ScenarioReport {
    let mut report = ScenarioReport::default();
    let mints = mint_list(&[token]);
    print_header("Anonymous Transfer");
    print_info(&format!("Sender: {}", session.user.pubkey()));
    print_info(&format!("Receiver: {}", receiver.pubkey()));
    print_info(&format!("Amount: {}", display_amount(token, amount)));

    read_balance(session, &mut report, "sender balance", &session.user, &mints).await;

    print_waiting("Submitting anonymous transfer...");
    if let Some(sig) = report.record(
        "anon transfer",
        session.anon_transfer(&receiver.pubkey(), token, amount).await,
    ) {
        print_success(&format!("Anon transfer txn signature: {}", sig));
    }

    read_balance(session, &mut report, "receiver balance", receiver, &mints).await;
    report
}

/// Amounts used by [`run_full`], in base units.
#[derive(Debug, Clone)]
pub struct FullFlowAmounts {
    pub deposit: String,
    pub withdraw: String,
    pub swap: String,
}

/// Deposit, withdraw, quote, swap, poll and a final balance read. Each step
/// runs regardless of how the previous ones went.
pub async fn run_full<A: DefiApi, C: ChainSubmitter>(
    session: &Session<A, C>,
    token_in: &Token,
    token_out: &Token,
    amounts: &FullFlowAmounts,
) -> ScenarioReport {
    let mut report = ScenarioReport::default();
    print_header("Full Flow");
    print_info(&format!("User: {}", session.user.pubkey()));
    print_info(&format!("Deposit: {}", display_amount(token_in, &amounts.deposit)));
    print_info(&format!("Withdraw: {}", display_amount(token_in, &amounts.withdraw)));
    print_info(&format!("Swap: {}", display_amount(token_in, &amounts.swap)));

    print_waiting("Sending deposit transaction...");
    if let Some(sig) = report.record("deposit", session.deposit(token_in, &amounts.deposit).await) {
        print_success(&format!("Deposit successful: {}", sig));
    }

    print_waiting("Sending withdraw transaction...");
    if let Some(sig) = report.record(
        "withdraw",
        session.withdraw(token_in, &amounts.withdraw, None).await,
    ) {
        print_success(&format!("Withdraw successful: {}", sig));
    }

    swap_steps(session, &mut report, token_in, token_out, &amounts.swap).await;

    read_balance(session, &mut report, "balance", &session.user, &mint_list(&[token_in, token_out]))
        .await;
    report
}
