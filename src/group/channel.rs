//! In-process transport: one scoped OS thread per rank.
//!
//! Every ordered pair of ranks gets its own zero-capacity channel, so a send
//! completes only when the peer takes the buffer. That turns each collective
//! into a rendezvous: the coordinator's replicate/scatter return once every
//! worker holds its copy, and a worker's gather returns once the coordinator
//! has taken its block.

use crossbeam::channel::{bounded, Receiver, Sender};
use tracing::trace;

use super::{check_len, WorkerGroup, COORDINATOR};
use crate::error::CommError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collective {
    Replicate,
    Scatter,
    Gather,
    Arrive,
    Release,
}

impl Collective {
    fn name(self) -> &'static str {
        match self {
            Collective::Replicate => "replicate",
            Collective::Scatter => "scatter",
            Collective::Gather => "gather",
            Collective::Arrive => "barrier-arrive",
            Collective::Release => "barrier-release",
        }
    }
}

struct Packet {
    op: Collective,
    payload: Vec<f64>,
}

/// One rank's endpoint. Owned by exactly one thread.
pub struct ChannelGroup {
    rank: usize,
    size: usize,
    // indexed by destination rank
    outbox: Vec<Sender<Packet>>,
    // indexed by source rank
    inbox: Vec<Receiver<Packet>>,
}

impl ChannelGroup {
    /// Build the endpoints of a `size`-rank group, in rank order.
    pub fn create(size: usize) -> Result<Vec<ChannelGroup>, CommError> {
        if size == 0 {
            return Err(CommError::InvalidGroupSize(size));
        }
        let mut outboxes: Vec<Vec<Sender<Packet>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut inboxes: Vec<Vec<Receiver<Packet>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        for src in 0..size {
            for inbox in inboxes.iter_mut() {
                let (tx, rx) = bounded(0);
                outboxes[src].push(tx);
                inbox.push(rx);
            }
        }
        Ok(outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (outbox, inbox))| ChannelGroup {
                rank,
                size,
                outbox,
                inbox,
            })
            .collect())
    }

    /// Run `f` on every rank of a fresh `size`-rank group, each on its own
    /// thread, and return the per-rank results in rank order.
    ///
    /// A rank's endpoint is dropped as soon as its `f` returns, so peers still
    /// waiting on it see [`CommError::Disconnected`] rather than hanging.
    pub fn launch<T, F>(size: usize, f: F) -> Result<Vec<T>, CommError>
    where
        F: Fn(&ChannelGroup) -> T + Sync,
        T: Send,
    {
        let endpoints = Self::create(size)?;
        let f = &f;
        std::thread::scope(|scope| {
            let handles: Vec<_> = endpoints
                .into_iter()
                .map(|endpoint| {
                    let rank = endpoint.rank;
                    let handle = scope.spawn(move || f(&endpoint));
                    (rank, handle)
                })
                .collect();
            // join every rank before reporting the first failure
            let joined: Vec<_> = handles
                .into_iter()
                .map(|(rank, handle)| handle.join().map_err(|_| CommError::RankPanicked(rank)))
                .collect();
            joined.into_iter().collect()
        })
    }

    fn send(&self, peer: usize, op: Collective, payload: Vec<f64>) -> Result<(), CommError> {
        trace!(rank = self.rank, peer, op = op.name(), len = payload.len(), "send");
        self.outbox[peer]
            .send(Packet { op, payload })
            .map_err(|_| CommError::Disconnected {
                rank: self.rank,
                peer,
            })
    }

    fn receive(&self, peer: usize, expected: Collective) -> Result<Vec<f64>, CommError> {
        let packet = self.inbox[peer].recv().map_err(|_| CommError::Disconnected {
            rank: self.rank,
            peer,
        })?;
        if packet.op != expected {
            return Err(CommError::Mismatch {
                rank: self.rank,
                peer,
                expected: expected.name(),
                found: packet.op.name(),
            });
        }
        trace!(rank = self.rank, peer, op = expected.name(), len = packet.payload.len(), "receive");
        Ok(packet.payload)
    }

    fn workers(&self) -> std::ops::Range<usize> {
        COORDINATOR + 1..self.size
    }
}

impl WorkerGroup for ChannelGroup {
    fn mode(&self) -> &'static str {
        "Distributed"
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn replicate(&self, buf: &mut [f64]) -> Result<(), CommError> {
        if self.is_coordinator() {
            for peer in self.workers() {
                self.send(peer, Collective::Replicate, buf.to_vec())?;
            }
            return Ok(());
        }
        let payload = self.receive(COORDINATOR, Collective::Replicate)?;
        check_len("replicate", buf.len(), payload.len())?;
        buf.copy_from_slice(&payload);
        Ok(())
    }

    fn partition_scatter(&self, send: Option<&[f64]>, recv: &mut [f64]) -> Result<(), CommError> {
        let chunk = recv.len();
        if self.is_coordinator() {
            let send = send.ok_or(CommError::MissingRootBuffer { op: "scatter" })?;
            check_len("scatter", self.size * chunk, send.len())?;
            for peer in self.workers() {
                let block = send[peer * chunk..(peer + 1) * chunk].to_vec();
                self.send(peer, Collective::Scatter, block)?;
            }
            recv.copy_from_slice(&send[..chunk]);
            return Ok(());
        }
        let payload = self.receive(COORDINATOR, Collective::Scatter)?;
        check_len("scatter", chunk, payload.len())?;
        recv.copy_from_slice(&payload);
        Ok(())
    }

    fn gather_collect(&self, send: &[f64], recv: Option<&mut [f64]>) -> Result<(), CommError> {
        let chunk = send.len();
        if !self.is_coordinator() {
            return self.send(COORDINATOR, Collective::Gather, send.to_vec());
        }
        let recv = recv.ok_or(CommError::MissingRootBuffer { op: "gather" })?;
        check_len("gather", self.size * chunk, recv.len())?;
        recv[..chunk].copy_from_slice(send);
        for peer in self.workers() {
            let payload = self.receive(peer, Collective::Gather)?;
            check_len("gather", chunk, payload.len())?;
            recv[peer * chunk..(peer + 1) * chunk].copy_from_slice(&payload);
        }
        Ok(())
    }

    fn barrier(&self) -> Result<(), CommError> {
        if self.is_coordinator() {
            for peer in self.workers() {
                self.receive(peer, Collective::Arrive)?;
            }
            for peer in self.workers() {
                self.send(peer, Collective::Release, Vec::new())?;
            }
            return Ok(());
        }
        self.send(COORDINATOR, Collective::Arrive, Vec::new())?;
        self.receive(COORDINATOR, Collective::Release)?;
        Ok(())
    }
}
