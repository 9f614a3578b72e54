//! Combat systems
//!
//! ECS systems that drive combatants once per frame and translate between
//! Bevy events and the regulators.

use bevy::prelude::*;

use super::bus::{CombatNotification, NotificationBus, NotificationQueue};
use super::combatant::{Combatant, IntentOutcome};
use super::events::*;
use super::log::{CombatLog, CombatLogEventType};
use super::{SimulationSpeed, Tick};
use crate::config::{CombatantConfig, ConfigError};

/// Bus traffic for one combatant, waiting to be forwarded into the ECS
#[derive(Component, Clone, Default)]
pub struct NotificationInbox(pub NotificationQueue);

/// Build a combatant on its own bus, with an inbox already subscribed to it
pub fn build_combatant(config: CombatantConfig) -> Result<(Combatant, NotificationInbox), ConfigError> {
    let bus = NotificationBus::new();
    let (queue, _subscription) = NotificationQueue::attach(&bus);
    let combatant = Combatant::new(config, bus)?;
    Ok((combatant, NotificationInbox(queue)))
}

/// Advance every combatant's timers by the frame delta
pub fn tick_combatants(
    time: Res<Time>,
    speed: Res<SimulationSpeed>,
    mut combatants: Query<&mut Combatant>,
) {
    if speed.is_paused() {
        return;
    }
    let dt = time.delta_secs() * speed.multiplier;
    for mut combatant in combatants.iter_mut() {
        combatant.update(dt);
    }
}

/// Apply fire/vent intents and announce the resulting shots
pub fn apply_combat_intents(
    mut intents: EventReader<CombatIntentEvent>,
    mut combatants: Query<&mut Combatant>,
    mut shots: EventWriter<ShotsFiredEvent>,
) {
    for event in intents.read() {
        let Ok(mut combatant) = combatants.get_mut(event.entity) else {
            continue;
        };

        match combatant.apply_intent(event.intent) {
            IntentOutcome::Fired(pattern) => {
                shots.send(ShotsFiredEvent {
                    shooter: event.entity,
                    pattern,
                });
            }
            IntentOutcome::FireRejected(reason) => {
                debug!("{} could not fire: {:?}", combatant.name(), reason);
            }
            IntentOutcome::Venting(accepted) => {
                if !accepted {
                    debug!("{} venting request refused", combatant.name());
                }
            }
        }
    }
}

/// Push damage through shield and health, logging the split
pub fn resolve_damage_events(
    mut damage_events: EventReader<DamageEvent>,
    mut combatants: Query<&mut Combatant>,
    mut death_events: EventWriter<CombatantDeathEvent>,
    mut combat_log: ResMut<CombatLog>,
) {
    for event in damage_events.read() {
        let Ok(mut combatant) = combatants.get_mut(event.target) else {
            continue;
        };

        // Skip if already dead
        if !combatant.is_alive() {
            continue;
        }

        let outcome = combatant.receive_damage(event.amount, event.category);
        let name = combatant.name().to_string();

        if outcome.absorbed > 0.0 {
            combat_log.log_amount(
                CombatLogEventType::Absorbed,
                &name,
                format!(
                    "{}'s {} absorbs {:.0} {} damage",
                    name,
                    combatant.shield().shield_type().name(),
                    outcome.absorbed,
                    event.category.name()
                ),
                Some(outcome.absorbed),
            );
        }
        if outcome.applied > 0.0 {
            combat_log.log_amount(
                CombatLogEventType::Damage,
                &name,
                format!(
                    "{} takes {:.0} {} damage",
                    name,
                    outcome.applied,
                    event.category.name()
                ),
                Some(outcome.applied),
            );
        }

        if outcome.killed {
            death_events.send(CombatantDeathEvent {
                victim: event.target,
                killer: event.source,
            });
        }
    }
}

/// Drain each combatant's inbox into ECS events
pub fn forward_notifications(
    inboxes: Query<(Entity, &NotificationInbox)>,
    mut notifications: EventWriter<CombatNotificationEvent>,
) {
    for (entity, inbox) in inboxes.iter() {
        for notification in inbox.0.drain() {
            notifications.send(CombatNotificationEvent {
                entity,
                notification,
            });
        }
    }
}

/// Record events to the combat log
pub fn record_combat_log(
    mut combat_log: ResMut<CombatLog>,
    time: Res<Time>,
    speed: Res<SimulationSpeed>,
    mut notifications: EventReader<CombatNotificationEvent>,
    mut shots: EventReader<ShotsFiredEvent>,
    combatants: Query<&Combatant>,
) {
    // Update match time
    combat_log.match_time += time.delta_secs() * speed.multiplier;

    for event in shots.read() {
        let name = combatant_name(&combatants, event.shooter);
        combat_log.log_amount(
            CombatLogEventType::ShotsFired,
            &name,
            format!(
                "{} fires {} ({} shot{})",
                name,
                event.pattern.mode.name(),
                event.pattern.shot_count(),
                if event.pattern.shot_count() > 1 { "s" } else { "" }
            ),
            Some(event.pattern.shot_count() as f32),
        );
    }

    for event in notifications.read() {
        let name = combatant_name(&combatants, event.entity);
        match &event.notification {
            CombatNotification::OverloadStarted => {
                info!("{} overloaded", name);
                combat_log.log(CombatLogEventType::Overload, &name, format!("{} overloads", name));
            }
            CombatNotification::OverloadEnded => {
                combat_log.log(
                    CombatLogEventType::Overload,
                    &name,
                    format!("{} recovers from overload", name),
                );
            }
            CombatNotification::ShieldActivated { type_name } => {
                combat_log.log(
                    CombatLogEventType::Shield,
                    &name,
                    format!("{} activates {}", name, type_name),
                );
            }
            CombatNotification::ShieldDepleted => {
                combat_log.log(
                    CombatLogEventType::Shield,
                    &name,
                    format!("{}'s shield is depleted", name),
                );
            }
            CombatNotification::Died => {
                info!("{} has been destroyed", name);
                combat_log.log(CombatLogEventType::Death, &name, format!("{} has been destroyed", name));
            }
            // Bar updates: too frequent to be worth a log line
            CombatNotification::LoadChanged { .. }
            | CombatNotification::ShieldChanged { .. }
            | CombatNotification::HealthChanged { .. } => {}
        }
    }
}

fn combatant_name(combatants: &Query<&Combatant>, entity: Entity) -> String {
    combatants
        .get(entity)
        .map(|c| c.name().to_string())
        .unwrap_or_else(|_| "Unknown".to_string())
}
