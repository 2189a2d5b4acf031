//! POVA Consensus Demo
//!
//! This demo runs a single host driving 3 validators through the POVA engine:
//! - Round-robin block production (2 second period by default)
//! - prepare → finalize_and_assemble → seal for every block
//! - Batch verification of the resulting chain, plus a forged header
//! - A seal interrupted by the stop signal
//!
//! Run with: `cargo run --bin pova_demo -- --blocks 6 --period 1 --verify-seal`
//! Log output is controlled by `RUST_LOG` (default `info,pova=debug`).

use alloy_primitives::{keccak256, Address, Bytes};
use eyre::{bail, eyre, WrapErr};
use pova_consensus::{
    consensus::pova::seal, stop_channel, ChainConfig, ChainHeaderReader, Clock,
    DefaultBlockAssembler, Genesis, Header, InMemoryHeaderStore, InMemoryState, Pova,
    PovaConfig, PovaError, Receipt, SystemClock,
};
use secp256k1::{PublicKey, SecretKey, SECP256K1};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command line options.
struct Args {
    /// Number of blocks to produce
    blocks: u64,
    /// Block period in seconds
    period: u64,
    /// Sign blocks and verify seals
    verify_seal: bool,
}

impl Args {
    fn parse() -> eyre::Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut blocks = 6;
        let mut period = 2;
        let mut verify_seal = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--blocks" | "-n" => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| eyre!("--blocks needs a value"))?;
                    blocks = value.parse().wrap_err("invalid --blocks")?;
                    i += 2;
                }
                "--period" | "-p" => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| eyre!("--period needs a value"))?;
                    period = value.parse().wrap_err("invalid --period")?;
                    i += 2;
                }
                "--verify-seal" => {
                    verify_seal = true;
                    i += 1;
                }
                other => bail!("unknown argument: {other}"),
            }
        }

        Ok(Self {
            blocks,
            period,
            verify_seal,
        })
    }
}

/// Deterministic validator keys, indexed by address.
fn validator_keys(count: u8) -> eyre::Result<(Vec<Address>, HashMap<Address, SecretKey>)> {
    let mut validators = Vec::new();
    let mut keys = HashMap::new();
    for i in 1..=count {
        let key = SecretKey::from_slice(&[i; 32])?;
        let address = seal::public_key_to_address(&PublicKey::from_secret_key(SECP256K1, &key));
        validators.push(address);
        keys.insert(address, key);
    }
    Ok((validators, keys))
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pova=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse()?;
    let (validators, keys) = validator_keys(3)?;

    // Stamped now so the first block waits one period
    let pova_config = PovaConfig::new(args.period).with_verify_seal(args.verify_seal);
    let genesis = Genesis {
        config: ChainConfig::new(1337).with_pova(pova_config),
        validators: validators.clone(),
        timestamp: SystemClock.now(),
    };
    let pova = Pova::from_genesis(&genesis)?;

    for (i, validator) in validators.iter().enumerate() {
        let first_turn = pova.schedule().next_turn(*validator, 0);
        info!(index = i, address = %validator, ?first_turn, "Validator");
    }

    let genesis_header = genesis.header();
    info!(hash = %genesis_header.hash(), time = genesis.timestamp, "Genesis");
    let store = Arc::new(InMemoryHeaderStore::with_headers([genesis_header]));

    let mut state = InMemoryState::new();
    let (results_tx, mut results_rx) = mpsc::channel(1);
    let (stop_handle, stop) = stop_channel();
    let mut produced = Vec::new();

    for number in 1..=args.blocks {
        let parent = store.current_header().ok_or_else(|| eyre!("empty chain"))?;
        let mut header = Header::new(number, parent.hash());
        pova.prepare(store.as_ref(), &mut header)?;

        // One synthetic transfer per block
        let tx = Bytes::from(format!("transfer #{number}").into_bytes());
        state.set(keccak256(&tx), Bytes::from(number.to_be_bytes().to_vec()));
        let receipts = vec![Receipt {
            success: true,
            cumulative_gas_used: 21_000,
        }];

        let mut block = pova.finalize_and_assemble(
            header,
            &mut state,
            &DefaultBlockAssembler,
            vec![tx],
            Vec::new(),
            receipts,
        )?;

        if args.verify_seal {
            let key = keys
                .get(&block.coinbase())
                .ok_or_else(|| eyre!("no key for producer"))?;
            seal::seal_header(&mut block.header, key);
        }

        let outcome = pova
            .seal(store.as_ref(), block, &results_tx, stop.clone())
            .await?;
        let sealed = results_rx
            .recv()
            .await
            .ok_or_else(|| eyre!("result channel closed"))?;

        info!(
            number = outcome.number,
            producer = %sealed.coinbase(),
            waited_ms = outcome.waited.as_millis() as u64,
            state_root = %sealed.header.state_root,
            "Block imported"
        );
        store.insert(sealed.header.clone());
        produced.push(sealed.header);
    }

    // Verify the chain we just built, plus a block claimed by the wrong validator
    let mut batch = produced.clone();
    if let Some(last) = produced.last() {
        let number = last.number + 1;
        let expected = pova
            .schedule()
            .producer_at(number)
            .ok_or_else(|| eyre!("no producer"))?;
        let claimed = validators
            .iter()
            .copied()
            .find(|v| *v != expected)
            .unwrap_or(Address::ZERO);
        let forged = Header::new(number, last.hash())
            .with_coinbase(claimed)
            .with_time(last.time + args.period);
        info!(number, %expected, %claimed, "Adding forged header");
        batch.push(forged);
    }

    let (_abort, mut results) = pova.verify_headers(batch.clone());
    let mut accepted = 0;
    for header in &batch {
        match results.recv().await {
            Some(Ok(())) => accepted += 1,
            Some(Err(err)) => warn!(number = header.number, %err, "Header rejected"),
            None => break,
        }
    }
    info!(accepted, total = batch.len(), "Batch verification finished");

    // A seal that is stopped before its slot arrives
    let parent = store.current_header().ok_or_else(|| eyre!("empty chain"))?;
    let mut header = Header::new(parent.number + 1, parent.hash());
    pova.prepare(store.as_ref(), &mut header)?;
    let block = pova.finalize_and_assemble(
        header,
        &mut state,
        &DefaultBlockAssembler,
        Vec::new(),
        Vec::new(),
        Vec::new(),
    )?;

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        stop_handle.stop();
    });

    match pova.seal(store.as_ref(), block, &results_tx, stop).await {
        Err(PovaError::SealingStopped) => info!("Pending seal stopped, nothing delivered"),
        Err(err) => return Err(err.into()),
        Ok(outcome) => warn!(number = outcome.number, "Seal completed before stop"),
    }

    pova.close()?;
    Ok(())
}
