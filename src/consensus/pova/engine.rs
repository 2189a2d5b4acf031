//! The POVA consensus engine as seen by the host node.
//!
//! # Block Lifecycle
//!
//! ```text
//!   prepare ──▶ (host executes txs) ──▶ finalize_and_assemble ──▶ seal ──▶ results
//!      │                                        │                    │
//!      │ coinbase = rotation producer           │ commit(number)     │ wait for slot
//!      │ difficulty = 1                         │ state_root =       │ deliver once
//!      │ time = max(parent + period, now)       │   intermediate_root│
//!      ▼                                        ▼                    ▼
//!
//!   verify_header / verify_headers: coinbase == rotation producer
//! ```

use super::{
    seal, AbortHandle, ConfigError, HeaderAuthorizer, Pacer, PovaError, PovaResult,
    RotationSchedule, StopSignal, VerificationPipeline, VerifyResults, POVA_DIFFICULTY,
};
use crate::{
    consensus::{ChainConfig, Clock, Genesis, SystemClock},
    miner::{BlockAssembler, SealOutcome, Sealer},
    primitives::{Block, Header, Receipt},
    storage::{ChainHeaderReader, StateCommitter},
};
use alloy_primitives::{Address, Bytes, B256};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// RPC namespace exposed by an engine. POVA registers none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDescriptor {
    /// Namespace the methods are served under.
    pub namespace: String,
    /// API version.
    pub version: String,
}

/// POVA consensus engine.
///
/// Holds no chain data and no mutable state; every operation reads the
/// rotation, the configuration and the clock. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Pova<C = SystemClock> {
    /// Chain configuration.
    config: Arc<ChainConfig>,

    /// Rotation check for incoming headers.
    authorizer: HeaderAuthorizer,

    /// Background batch verification.
    pipeline: VerificationPipeline,

    /// Timestamp policy for prepared headers.
    pacer: Pacer,

    /// Slot pacing and delivery for local blocks.
    sealer: Sealer<C>,

    /// Wall clock used by `prepare`.
    clock: C,
}

impl Pova<SystemClock> {
    /// Create an engine driven by the system clock.
    pub fn new(config: Arc<ChainConfig>, validators: Vec<Address>) -> Result<Self, ConfigError> {
        Self::with_clock(config, validators, SystemClock)
    }

    /// Create an engine from a parsed genesis document.
    pub fn from_genesis(genesis: &Genesis) -> Result<Self, ConfigError> {
        Self::new(Arc::new(genesis.config.clone()), genesis.validators.clone())
    }
}

impl<C: Clock + Clone> Pova<C> {
    /// Create an engine reading time from `clock`.
    pub fn with_clock(
        config: Arc<ChainConfig>,
        validators: Vec<Address>,
        clock: C,
    ) -> Result<Self, ConfigError> {
        let schedule = RotationSchedule::new(validators)?;
        let verify_seal = config.verify_seal();
        let pacer = Pacer::new(config.period());
        let authorizer = HeaderAuthorizer::new(schedule, verify_seal);

        info!(
            target: "pova::engine",
            chain_id = config.chain_id,
            validators = authorizer.schedule().len(),
            period = pacer.period(),
            max_seal_wait_secs = config.max_seal_wait().as_secs(),
            "POVA engine created"
        );
        if !verify_seal {
            warn!(
                target: "pova::engine",
                "Seal verification disabled, block producers are trusted by declared coinbase"
            );
        }

        Ok(Self {
            pipeline: VerificationPipeline::new(authorizer.clone()),
            sealer: Sealer::new(pacer, config.max_seal_wait(), clock.clone()),
            config,
            authorizer,
            pacer,
            clock,
        })
    }

    /// Chain configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Producer rotation.
    pub fn schedule(&self) -> &RotationSchedule {
        self.authorizer.schedule()
    }

    /// Block pacing policy.
    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    /// Address credited with producing `header`: its declared coinbase.
    pub fn author(&self, header: &Header) -> PovaResult<Address> {
        Ok(header.coinbase)
    }

    /// Verify that `header` was produced by the validator whose turn it is.
    pub fn verify_header(&self, header: &Header) -> PovaResult<()> {
        self.authorizer.verify(header)
    }

    /// Verify `headers` on a background task.
    ///
    /// Yields one result per header in input order until aborted. Runs on the
    /// current tokio runtime, or on a dedicated thread when there is none.
    pub fn verify_headers(&self, headers: Vec<Header>) -> (AbortHandle, VerifyResults) {
        debug!(target: "pova::engine", count = headers.len(), "Verifying headers");
        self.pipeline.verify_batch(headers)
    }

    /// POVA blocks carry no ommers worth checking.
    pub fn verify_uncles(&self, _block: &Block) -> PovaResult<()> {
        Ok(())
    }

    /// Fill the consensus fields of a header about to be built.
    ///
    /// Sets `coinbase` to the rotation producer, `difficulty` to 1 and `time`
    /// to `max(parent.time + period, now)`, or `now` when the parent is unknown.
    pub fn prepare<R>(&self, chain: &R, header: &mut Header) -> PovaResult<()>
    where
        R: ChainHeaderReader + ?Sized,
    {
        if header.is_genesis() {
            return Err(PovaError::GenesisNotProducible);
        }
        let producer = self
            .schedule()
            .producer_at(header.number)
            .ok_or(PovaError::GenesisNotProducible)?;

        let parent_time = chain
            .get_header(header.parent_hash, header.number - 1)
            .map(|parent| parent.time);

        header.coinbase = producer;
        header.difficulty = POVA_DIFFICULTY;
        header.time = self.pacer.stamp(parent_time, self.clock.now());

        debug!(
            target: "pova::engine",
            number = header.number,
            producer = %producer,
            time = header.time,
            parent_known = parent_time.is_some(),
            "Prepared header"
        );
        Ok(())
    }

    /// Post-transaction hook. POVA has no block rewards or system calls.
    pub fn finalize<S>(
        &self,
        _header: &Header,
        _state: &mut S,
        _transactions: &[Bytes],
        _ommers: &[Header],
    ) where
        S: StateCommitter + ?Sized,
    {
    }

    /// Commit state, record the state root and assemble the block.
    pub fn finalize_and_assemble<S, A>(
        &self,
        mut header: Header,
        state: &mut S,
        assembler: &A,
        transactions: Vec<Bytes>,
        ommers: Vec<Header>,
        receipts: Vec<Receipt>,
    ) -> PovaResult<Block>
    where
        S: StateCommitter + ?Sized,
        A: BlockAssembler + ?Sized,
    {
        state.commit(header.number)?;
        header.state_root = state.intermediate_root();

        debug!(
            target: "pova::engine",
            number = header.number,
            state_root = %header.state_root,
            transactions = transactions.len(),
            "Assembling block"
        );
        Ok(assembler.assemble(header, transactions, ommers, receipts))
    }

    /// Hold `block` until its slot, then deliver it on `results`.
    ///
    /// See [`Sealer::seal`].
    pub async fn seal<R>(
        &self,
        chain: &R,
        block: Block,
        results: &mpsc::Sender<Block>,
        stop: StopSignal,
    ) -> PovaResult<SealOutcome>
    where
        R: ChainHeaderReader + ?Sized,
    {
        self.sealer.seal(chain, block, results, stop).await
    }

    /// Hash a producer signs over.
    ///
    /// With seal verification on, the trailing 65-byte signature in `extra` is
    /// left out. Otherwise headers carry no seal and this is the plain header
    /// hash, whatever the length of `extra`.
    pub fn seal_hash(&self, header: &Header) -> B256 {
        if self.authorizer.verifies_seal() {
            seal::seal_hash(header)
        } else {
            header.hash()
        }
    }

    /// Difficulty of the next block. Always 1.
    pub fn calc_difficulty(&self, _time: u64, _parent: Option<&Header>) -> u64 {
        POVA_DIFFICULTY
    }

    /// RPC APIs provided by the engine.
    pub fn apis(&self) -> Vec<ApiDescriptor> {
        Vec::new()
    }

    /// Release engine resources. Nothing to release.
    pub fn close(&self) -> PovaResult<()> {
        Ok(())
    }
}
