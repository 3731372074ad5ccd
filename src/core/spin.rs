//! Reward wheel
//!
//! A spin is split in two phases so the wheel can animate between them:
//! [`SpinWheel::start`] draws the segment and keeps the drawn ticket for the
//! user, [`SpinWheel::finish`] hands that ticket back once the ledger has
//! credited it. The landing angle is derived from the drawn index alone, and
//! only the kept ticket is ever credited, so what the wheel shows always
//! agrees with what is paid.

use crate::config::WheelConfig;
use crate::types::{LedgerError, UserId};
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Outcome of a started spin
#[derive(Debug, Clone, PartialEq)]
pub struct SpinTicket {
    pub user_id: UserId,
    /// Winning segment
    pub index: usize,
    pub reward: Decimal,
    /// Degrees the wheel turns during the animation
    pub total_rotation: u32,
    /// Resting angle after the animation, in `[0, 360)`
    pub settle_angle: u32,
}

/// Wheel layout plus the drawn, not yet settled ticket of each user
#[derive(Debug, Clone)]
pub struct SpinWheel {
    config: WheelConfig,
    in_flight: HashMap<UserId, SpinTicket>,
}

impl SpinWheel {
    pub fn new(config: WheelConfig) -> Self {
        SpinWheel {
            config,
            in_flight: HashMap::new(),
        }
    }

    pub fn rewards(&self) -> &[Decimal] {
        &self.config.rewards
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn is_in_flight(&self, user_id: &str) -> bool {
        self.in_flight.contains_key(user_id)
    }

    /// The drawn ticket of a spin in flight
    pub fn pending(&self, user_id: &str) -> Option<&SpinTicket> {
        self.in_flight.get(user_id)
    }

    /// Angular width of one segment, in whole degrees
    fn segment_angle(&self) -> u32 {
        360 / self.config.rewards.len().max(1) as u32
    }

    /// Build the ticket for landing on `index`
    pub fn ticket_for(&self, user_id: &str, index: usize) -> SpinTicket {
        let offset = self.segment_angle() * index as u32;
        let landing = 360 - offset;
        SpinTicket {
            user_id: user_id.to_string(),
            index,
            reward: self.config.rewards[index],
            total_rotation: self.config.full_turns * 360 + landing,
            settle_angle: landing % 360,
        }
    }

    /// Draw a segment uniformly and mark the user in flight
    ///
    /// Credit checks belong to the caller; this only guards re-entry.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        user_id: &str,
        rng: &mut R,
    ) -> Result<SpinTicket, LedgerError> {
        if self.is_in_flight(user_id) {
            return Err(LedgerError::SpinInFlight {
                user: user_id.to_string(),
            });
        }
        let index = rng.gen_range(0..self.config.rewards.len());
        let ticket = self.ticket_for(user_id, index);
        self.in_flight.insert(user_id.to_string(), ticket.clone());
        Ok(ticket)
    }

    /// Take back the drawn ticket, ending the spin
    ///
    /// Used both to settle and to abandon a spin.
    pub fn finish(&mut self, user_id: &str) -> Result<SpinTicket, LedgerError> {
        self.in_flight
            .remove(user_id)
            .ok_or_else(|| LedgerError::SpinNotInFlight {
                user: user_id.to_string(),
            })
    }
}
