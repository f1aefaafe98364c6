//! Call session tracking for the signaling relay
//!
//! The relay keeps an explicit session per placed call so that answers,
//! rejections, and hang-ups are validated against a call that actually
//! exists, and so ringing calls can be expired instead of ringing forever.
//! Signaling payloads themselves never enter this module; it tracks only
//! who is talking to whom.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::error::{Result, SnapfeedError};

/// Lifecycle of a call session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Ringing,
    Accepted,
    Rejected,
    Ended,
    Failed,
}

/// One placed call between two connections
#[derive(Debug, Clone)]
pub struct CallSession {
    pub id: Uuid,
    pub caller_conn: String,
    pub callee_conn: String,
    pub state: CallState,
    pub started_at: Instant,
}

/// Tracks live call sessions. Only `Ringing` and `Accepted` sessions are
/// retained; terminal transitions remove the session.
pub struct CallRegistry {
    sessions: HashMap<Uuid, CallSession>,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Record a newly placed call in the ringing state. A retried offer
    /// supersedes any live session between the same pair, so a stale ringing
    /// twin cannot linger and later expire under an accepted call.
    pub fn place(&mut self, caller_conn: String, callee_conn: String) -> Uuid {
        if let Some(stale) = self.find_between(&caller_conn, &callee_conn) {
            self.sessions.remove(&stale);
        }

        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            CallSession {
                id,
                caller_conn,
                callee_conn,
                state: CallState::Ringing,
                started_at: Instant::now(),
            },
        );
        id
    }

    fn find_between(&self, caller_conn: &str, callee_conn: &str) -> Option<Uuid> {
        self.sessions
            .values()
            .find(|s| s.caller_conn == caller_conn && s.callee_conn == callee_conn)
            .map(|s| s.id)
    }

    /// The callee accepts a ringing call. `caller_conn` is the `to` field of
    /// the answer event; the sender must be the callee of that session.
    pub fn answer(&mut self, callee_conn: &str, caller_conn: &str) -> Result<()> {
        let id = self
            .find_between(caller_conn, callee_conn)
            .ok_or_else(|| SnapfeedError::CallSessionNotFound(caller_conn.to_string()))?;

        let session = self.sessions.get_mut(&id).ok_or_else(|| {
            SnapfeedError::CallSessionNotFound(caller_conn.to_string())
        })?;

        if session.state != CallState::Ringing {
            return Err(SnapfeedError::CallSessionNotFound(caller_conn.to_string()));
        }

        session.state = CallState::Accepted;
        Ok(())
    }

    /// The callee rejects a ringing call; the session is discarded.
    pub fn reject(&mut self, callee_conn: &str, caller_conn: &str) -> Result<()> {
        let id = self
            .find_between(caller_conn, callee_conn)
            .ok_or_else(|| SnapfeedError::CallSessionNotFound(caller_conn.to_string()))?;

        let ringing = self
            .sessions
            .get(&id)
            .map(|s| s.state == CallState::Ringing)
            .unwrap_or(false);
        if !ringing {
            return Err(SnapfeedError::CallSessionNotFound(caller_conn.to_string()));
        }

        self.sessions.remove(&id);
        Ok(())
    }

    /// Either party hangs up a ringing or accepted call; the session is
    /// discarded.
    pub fn end(&mut self, sender_conn: &str, peer_conn: &str) -> Result<()> {
        let id = self
            .find_between(sender_conn, peer_conn)
            .or_else(|| self.find_between(peer_conn, sender_conn))
            .ok_or_else(|| SnapfeedError::CallSessionNotFound(peer_conn.to_string()))?;

        self.sessions.remove(&id);
        Ok(())
    }

    /// Remove ringing sessions older than `timeout`, returning them so the
    /// relay can notify both parties.
    pub fn expire_ringing(&mut self, timeout: Duration) -> Vec<CallSession> {
        let expired: Vec<Uuid> = self
            .sessions
            .values()
            .filter(|s| s.state == CallState::Ringing && s.started_at.elapsed() >= timeout)
            .map(|s| s.id)
            .collect();

        expired
            .into_iter()
            .filter_map(|id| {
                self.sessions.remove(&id).map(|mut s| {
                    s.state = CallState::Failed;
                    s
                })
            })
            .collect()
    }

    /// Remove every session involving a disconnecting connection, returning
    /// the peer connection ids to notify.
    pub fn end_for_connection(&mut self, connection_id: &str) -> Vec<String> {
        let involved: Vec<Uuid> = self
            .sessions
            .values()
            .filter(|s| s.caller_conn == connection_id || s.callee_conn == connection_id)
            .map(|s| s.id)
            .collect();

        involved
            .into_iter()
            .filter_map(|id| {
                self.sessions.remove(&id).map(|s| {
                    if s.caller_conn == connection_id {
                        s.callee_conn
                    } else {
                        s.caller_conn
                    }
                })
            })
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for CallRegistry {
    fn default() -> Self {
        Self::new()
    }
}
