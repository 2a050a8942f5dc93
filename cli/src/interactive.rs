//! Console dialogue that reads a ledger token by token.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Context};

use netsettle_common::{Party, PaymentType, RawTransaction};

use crate::scenario::Scenario;

/// Whitespace-separated tokens from a line reader.
struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self, what: &str) -> anyhow::Result<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }

            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("failed to read {}", what))?;
            if read == 0 {
                bail!("unexpected end of input while reading {}", what);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }

    fn next_count(&mut self, what: &str) -> anyhow::Result<usize> {
        let token = self.next_token(what)?;
        token
            .parse()
            .map_err(|_| anyhow!("expected a non-negative count for {}, got '{}'", what, token))
    }

    fn next_amount(&mut self, what: &str) -> anyhow::Result<i64> {
        let token = self.next_token(what)?;
        token
            .parse()
            .map_err(|_| anyhow!("expected an integer amount for {}, got '{}'", what, token))
    }
}

/// Prompt for banks and transactions on `output` and read answers from `input`.
pub fn read_scenario<R: BufRead, W: Write>(input: R, mut output: W) -> anyhow::Result<Scenario> {
    let mut tokens = Tokens::new(input);

    prompt(&mut output, "Enter the number of banks: ")?;
    let bank_count = tokens.next_count("number of banks")?;

    let mut parties = Vec::with_capacity(bank_count);
    for i in 1..=bank_count {
        prompt(&mut output, &format!("Enter the name of bank {}: ", i))?;
        let name = tokens.next_token("bank name")?;

        prompt(&mut output, &format!("Enter the number of payment types for bank {}: ", i))?;
        let type_count = tokens.next_count("number of payment types")?;

        prompt(&mut output, &format!("Enter the payment types for bank {}:\n", i))?;
        let mut types = Vec::with_capacity(type_count);
        for j in 1..=type_count {
            prompt(&mut output, &format!("Payment type {}: ", j))?;
            types.push(PaymentType::new(tokens.next_token("payment type")?));
        }

        parties.push(Party::new(name, types));
    }

    prompt(&mut output, "Enter the number of transactions: ")?;
    let tx_count = tokens.next_count("number of transactions")?;

    prompt(&mut output, "Enter the transactions:\n")?;
    let mut transactions = Vec::with_capacity(tx_count);
    for i in 1..=tx_count {
        prompt(&mut output, &format!("Transaction {}:\nDebtor name: ", i))?;
        let debtor = tokens.next_token("debtor name")?;
        prompt(&mut output, "Creditor name: ")?;
        let creditor = tokens.next_token("creditor name")?;
        prompt(&mut output, "Amount: ")?;
        let amount = tokens.next_amount("amount")?;

        transactions.push(RawTransaction::new(debtor, creditor, amount));
    }

    Ok(Scenario {
        name: "interactive".to_string(),
        description: String::new(),
        parties,
        transactions,
    })
}

fn prompt<W: Write>(output: &mut W, text: &str) -> anyhow::Result<()> {
    output.write_all(text.as_bytes())?;
    output.flush()?;
    Ok(())
}
