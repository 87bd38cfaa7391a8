//! Point-to-point message transport.
//!
//! The mover posts sends early, overlaps local work, then blocks on the
//! receives it needs. [`Transport`] captures exactly that shape;
//! [`LocalFabric`] implements it in-process over crossbeam channels,
//! one transport handle per simulated rank.

use std::collections::HashMap;
use std::sync::Mutex;

use aurora_core::Rank;
use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::error::CommError;
use crate::tag::MessageTag;

/// A point-to-point transport endpoint for one rank.
pub trait Transport: Send + Sync {
    /// This endpoint's rank.
    fn rank(&self) -> Rank;

    /// Post a message to `dest`. Non-blocking; completion is observed
    /// via [`Transport::wait_sends`].
    fn send(&self, dest: Rank, tag: MessageTag, payload: Vec<u8>) -> Result<(), CommError>;

    /// Block until the message with `tag` from `source` arrives.
    ///
    /// Messages arriving out of tag order are stashed, so callers may
    /// drain their receive list in any order.
    fn recv(&self, source: Rank, tag: MessageTag) -> Result<Vec<u8>, CommError>;

    /// Block until all posted sends have been handed off.
    ///
    /// The in-process fabric hands off on `send`, so the default is a
    /// no-op; a real interconnect backend would flush here.
    fn wait_sends(&self) -> Result<(), CommError> {
        Ok(())
    }
}

type Frame = (MessageTag, Vec<u8>);

/// One rank's endpoint in a [`LocalFabric`].
pub struct LocalTransport {
    rank: Rank,
    outgoing: Vec<Sender<Frame>>,
    incoming: Vec<Receiver<Frame>>,
    stash: Mutex<HashMap<(Rank, MessageTag), Vec<u8>>>,
}

impl Transport for LocalTransport {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn send(&self, dest: Rank, tag: MessageTag, payload: Vec<u8>) -> Result<(), CommError> {
        let tx = self
            .outgoing
            .get(dest.0 as usize)
            .ok_or(CommError::UnknownRank(dest))?;
        tx.send((tag, payload))
            .map_err(|_| CommError::Disconnected { peer: dest })
    }

    fn recv(&self, source: Rank, tag: MessageTag) -> Result<Vec<u8>, CommError> {
        // recv holds the stash lock across the channel wait. Each rank
        // is driven by a single mover thread, so the lock is never
        // contended; it exists to keep the endpoint Sync.
        let mut stash = self
            .stash
            .lock()
            .map_err(|_| CommError::Disconnected { peer: source })?;
        if let Some(payload) = stash.remove(&(source, tag)) {
            return Ok(payload);
        }
        let rx = self
            .incoming
            .get(source.0 as usize)
            .ok_or(CommError::UnknownRank(source))?;
        loop {
            let (got_tag, payload) = rx
                .recv()
                .map_err(|_| CommError::Disconnected { peer: source })?;
            if got_tag == tag {
                return Ok(payload);
            }
            stash.insert((source, got_tag), payload);
        }
    }
}

/// An in-process fabric of `n` fully-connected rank endpoints.
pub struct LocalFabric;

impl LocalFabric {
    /// Create the endpoints of an `n`-rank fabric.
    ///
    /// Endpoint `i` is rank `i`; move each endpoint onto its own thread
    /// to simulate a distributed run.
    pub fn endpoints(n: u32) -> Vec<LocalTransport> {
        let n = n as usize;
        // channels[from][to]
        let mut txs: Vec<Vec<Sender<Frame>>> = (0..n).map(|_| Vec::with_capacity(n)).collect();
        let mut rxs: Vec<Vec<Receiver<Frame>>> = (0..n).map(|_| Vec::with_capacity(n)).collect();
        for from in 0..n {
            for to in 0..n {
                let (tx, rx) = unbounded();
                txs[from].push(tx);
                rxs[to].push(rx);
            }
        }
        txs.into_iter()
            .zip(rxs)
            .enumerate()
            .map(|(rank, (outgoing, incoming))| LocalTransport {
                rank: Rank(rank as u32),
                outgoing,
                incoming,
                stash: Mutex::new(HashMap::new()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_between_ranks() {
        let mut eps = LocalFabric::endpoints(2);
        let b = eps.pop().unwrap();
        let a = eps.pop().unwrap();
        a.send(Rank(1), MessageTag(7), vec![1, 2, 3]).unwrap();
        assert_eq!(b.recv(Rank(0), MessageTag(7)).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn out_of_order_tags_are_stashed() {
        let mut eps = LocalFabric::endpoints(2);
        let b = eps.pop().unwrap();
        let a = eps.pop().unwrap();
        a.send(Rank(1), MessageTag(1), vec![1]).unwrap();
        a.send(Rank(1), MessageTag(2), vec![2]).unwrap();
        assert_eq!(b.recv(Rank(0), MessageTag(2)).unwrap(), vec![2]);
        assert_eq!(b.recv(Rank(0), MessageTag(1)).unwrap(), vec![1]);
    }

    #[test]
    fn self_send_works() {
        let mut eps = LocalFabric::endpoints(1);
        let a = eps.pop().unwrap();
        a.send(Rank(0), MessageTag(5), vec![9]).unwrap();
        assert_eq!(a.recv(Rank(0), MessageTag(5)).unwrap(), vec![9]);
    }

    #[test]
    fn unknown_rank_is_rejected() {
        let mut eps = LocalFabric::endpoints(1);
        let a = eps.pop().unwrap();
        assert_eq!(
            a.send(Rank(3), MessageTag(0), vec![]),
            Err(CommError::UnknownRank(Rank(3)))
        );
    }

    #[test]
    fn dropped_peer_is_a_disconnect() {
        let mut eps = LocalFabric::endpoints(2);
        let b = eps.pop().unwrap();
        drop(eps.pop());
        assert_eq!(
            b.recv(Rank(0), MessageTag(0)),
            Err(CommError::Disconnected { peer: Rank(0) })
        );
    }
}
