//! Saga step bodies.
//!
//! Steps are best effort: a failed subsystem call is reported on the
//! mission's channels and the step moves on. Only the transfer withdrawal
//! policy can stop a step early.

use crate::mission::Mission;
use crate::saga::SagaStep;
use exchange_core::{Config, TransferErrorPolicy};
use exchange_gamecomm::{CommandBus, CommandResult};
use tracing::{debug, warn};

/// Credits paid per unit delivered
const CREDITS_PER_UNIT: f64 = 2.0;

/// A withdrawal whose failure is governed by the transfer policy
#[derive(Debug, Clone, Copy)]
enum Withdrawal<'a> {
    /// Take `amount` out of the home base
    Base { resource: &'a str, amount: u32 },
    /// Empty the squad's cargo of `resource`
    Cargo { squad: usize, resource: &'a str },
}

/// Everything a step needs besides the mission itself
#[derive(Debug, Clone)]
pub struct StepContext {
    bus: CommandBus,
    policy: TransferErrorPolicy,
    harvest_amount: u32,
}

impl StepContext {
    pub fn new(bus: CommandBus, policy: TransferErrorPolicy, harvest_amount: u32) -> Self {
        Self {
            bus,
            policy,
            harvest_amount,
        }
    }

    pub fn from_config(bus: CommandBus, config: &Config) -> Self {
        Self::new(
            bus,
            config.scheduler.transfer_error_policy,
            config.harvest.harvested_amount(),
        )
    }

    pub fn bus(&self) -> &CommandBus {
        &self.bus
    }

    /// Run one step of `mission`
    pub async fn run(&self, step: SagaStep, mission: &Mission) {
        let Some(squad) = mission.lead_squad() else {
            warn!(mission_id = %mission.id, step = step.name(), "mission has no squads");
            return;
        };
        debug!(mission_id = %mission.id, step = step.name(), squad, "running saga step");

        match step {
            SagaStep::Arriving => self.arriving(mission),
            SagaStep::Harvesting => self.harvesting(mission, squad).await,
            SagaStep::Returning => self.returning(mission, squad).await,
            SagaStep::Leaving => self.leaving(mission, squad).await,
            SagaStep::Arrival => self.arrival(mission, squad).await,
            SagaStep::BackToBase => self.back_to_base(mission, squad),
        }
    }

    fn arriving(&self, mission: &Mission) {
        mission.notify(format!(
            "Mission Notification: Squad {:?}, reached destination.",
            mission.squads
        ));
    }

    async fn harvesting(&self, mission: &Mission, squad: usize) {
        for resource in &mission.resources {
            // The squad is loaded with the planned yield even when the planet
            // could not supply it.
            let harvested = match self
                .bus
                .remove_resources_from_planet(&mission.planet_id, resource, self.harvest_amount)
                .await
            {
                Ok(harvested) => harvested,
                Err(err) => {
                    mission.report(SagaStep::Harvesting, err);
                    self.harvest_amount
                }
            };
            if let Err(err) = self
                .bus
                .add_resources_to_squad(mission.corporation_id, squad, resource, harvested)
                .await
            {
                mission.report(SagaStep::Harvesting, err);
            }
        }
        mission.notify(format!(
            "Mission Notification: Squad {:?}, finished harvesting.",
            mission.squads
        ));
    }

    async fn returning(&self, mission: &Mission, squad: usize) {
        mission.notify(format!(
            "Mission Notification: Squad {:?} returned to base.",
            mission.squads
        ));
        for resource in &mission.resources {
            let removed = match self
                .bus
                .remove_all_resources_from_squad(mission.corporation_id, squad, resource)
                .await
            {
                Ok(removed) => removed,
                Err(err) => {
                    mission.report(SagaStep::Returning, err);
                    0
                }
            };
            // Reports the base's new total, or what was unloaded if the base
            // refused it.
            let stored = match self
                .bus
                .add_resources_to_base(mission.corporation_id, resource, removed)
                .await
            {
                Ok(total) => total,
                Err(err) => {
                    mission.report(SagaStep::Returning, err);
                    removed
                }
            };
            mission.notify(format!(
                "Mission Notification: Added to base {} -> #{}",
                resource, stored
            ));
        }
    }

    async fn leaving(&self, mission: &Mission, squad: usize) {
        for resource in &mission.resources {
            let withdrawal = Withdrawal::Base {
                resource,
                amount: mission.amount,
            };
            let Some(loaded) = self
                .withdraw(mission, SagaStep::Leaving, withdrawal, mission.amount)
                .await
            else {
                return;
            };
            if let Err(err) = self
                .bus
                .add_resources_to_squad(mission.corporation_id, squad, resource, loaded)
                .await
            {
                mission.report(SagaStep::Leaving, err);
            }
        }
        mission.notify(format!(
            "Mission Notification: Squad {:?}, started travel.",
            mission.squads
        ));
    }

    async fn arrival(&self, mission: &Mission, squad: usize) {
        let mut credited = 0.0;
        for resource in &mission.resources {
            let withdrawal = Withdrawal::Cargo { squad, resource };
            let Some(delivered) = self
                .withdraw(mission, SagaStep::Arrival, withdrawal, mission.amount)
                .await
            else {
                return;
            };
            if let Err(err) = self
                .bus
                .add_resources_to_planet(&mission.planet_id, resource, delivered)
                .await
            {
                mission.report(SagaStep::Arrival, err);
            }
            let credits = f64::from(delivered) * CREDITS_PER_UNIT;
            match self.bus.add_credits(mission.corporation_id, credits).await {
                Ok(_) => credited += credits,
                Err(err) => mission.report(SagaStep::Arrival, err),
            }
        }
        mission.notify(format!(
            "Mission Notification: Squad {}, made the delivery. Added Credits: ${}",
            squad, credited
        ));
    }

    fn back_to_base(&self, mission: &Mission, squad: usize) {
        mission.notify(format!(
            "Mission Notification: Squad {} is back to base",
            squad
        ));
    }

    async fn issue(&self, mission: &Mission, withdrawal: Withdrawal<'_>) -> CommandResult<u32> {
        match withdrawal {
            Withdrawal::Base { resource, amount } => {
                self.bus
                    .remove_resources_from_base(mission.corporation_id, resource, amount)
                    .await
            }
            Withdrawal::Cargo { squad, resource } => {
                self.bus
                    .remove_all_resources_from_squad(mission.corporation_id, squad, resource)
                    .await
            }
        }
    }

    /// Perform a withdrawal, applying the transfer policy on failure.
    ///
    /// Returns the quantity to carry on with, or `None` when the step must
    /// stop.
    async fn withdraw(
        &self,
        mission: &Mission,
        step: SagaStep,
        withdrawal: Withdrawal<'_>,
        fallback: u32,
    ) -> Option<u32> {
        let err = match self.issue(mission, withdrawal).await {
            Ok(quantity) => return Some(quantity),
            Err(err) => err,
        };
        mission.report(step, err);

        match self.policy {
            TransferErrorPolicy::UseRequestedAmount => Some(fallback),
            TransferErrorPolicy::Abort => {
                warn!(mission_id = %mission.id, step = step.name(), "withdrawal failed, aborting step");
                None
            }
            TransferErrorPolicy::Retry { attempts } => {
                for attempt in 1..=attempts {
                    match self.issue(mission, withdrawal).await {
                        Ok(quantity) => return Some(quantity),
                        Err(err) => {
                            debug!(mission_id = %mission.id, step = step.name(), attempt, error = %err, "withdrawal retry failed")
                        }
                    }
                }
                warn!(mission_id = %mission.id, step = step.name(), attempts, "withdrawal retries exhausted, aborting step");
                None
            }
        }
    }
}
