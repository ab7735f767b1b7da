//! Turn resolution.
//!
//! [`GameEngine`] owns one level at a time plus the player and run progress.
//! Each [`Intent`] is resolved as: player action, then the enemy phase
//! (parallel AI decisions applied in creation order), then status ticks.
//! A rejected intent returns `Err` and leaves every piece of state as it was.

pub mod autoplay;
pub mod config;
pub mod messages;

use std::collections::HashSet;

use tracing::{debug, info};

pub use config::{CountRange, GameConfig, MapBounds};
pub use messages::{GameSnapshot, Intent, TurnEvent, TurnReport};

use crate::combat::status::{StatusEffect, StatusType};
use crate::combat::{resolve_exchange, AttackerProfile};
use crate::entity::{Combatant, Direction, Position};
use crate::error::{ConfigError, TurnError};
use crate::generation::floor_manager::{LevelProgress, StairDirection};
use crate::generation::layout::{generate_dungeon, Dungeon, TileKind};
use crate::generation::placement::{place_entities, PlacedItem};
use crate::logging::TimingSpan;
use crate::loot;
use crate::monster::ai::{plan_turn, AiAction, AiContext};
use crate::monster::Enemy;
use crate::player::inventory::EquipSlot;
use crate::player::Player;
use crate::rng::GameRng;

/// Trap damage: base plus per-depth increment
const TRAP_BASE_DAMAGE: u32 = 5;
const TRAP_DAMAGE_PER_DEPTH: u32 = 2;
const HAZARD_BURN_TURNS: u32 = 3;

pub struct GameEngine {
    config: GameConfig,
    rng: GameRng,
    progress: LevelProgress,
    dungeon: Dungeon,
    player: Player,
    enemies: Vec<Enemy>,
    floor_items: Vec<PlacedItem>,
    turn: u64,
}

impl GameEngine {
    /// Validate `config` and build depth 1.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let run_seed = match config.seed {
            Some(seed) => seed,
            None => GameRng::from_seed_option(None).next_u64(),
        };
        info!(run_seed, "starting run");

        let progress = LevelProgress::new(run_seed);
        let (dungeon, enemies, floor_items) = Self::build_level(&config, &progress, 1)?;
        let player = Player::new("Delver", dungeon.spawn);
        Ok(Self {
            rng: GameRng::seeded(run_seed),
            config,
            progress,
            dungeon,
            player,
            enemies,
            floor_items,
            turn: 0,
        })
    }

    /// Levels are generated from their own per-depth seed, independent of
    /// how many combat rolls came before.
    fn build_level(
        config: &GameConfig,
        progress: &LevelProgress,
        depth: u32,
    ) -> Result<(Dungeon, Vec<Enemy>, Vec<PlacedItem>), ConfigError> {
        let _span = TimingSpan::new("build_level");
        let mut level_rng = GameRng::seeded(progress.level_seed(depth));
        let dungeon = generate_dungeon(config, depth, &mut level_rng)?;
        let tier = config
            .difficulty
            .tier_for(depth)
            .ok_or(ConfigError::EmptyDifficultyTable)?;
        let placement = place_entities(&dungeon, tier, &config.ai, &mut level_rng);
        Ok((dungeon, placement.enemies, placement.items))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut Vec<Enemy> {
        &mut self.enemies
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn floor_items(&self) -> &[PlacedItem] {
        &self.floor_items
    }

    pub fn floor_items_mut(&mut self) -> &mut Vec<PlacedItem> {
        &mut self.floor_items
    }

    pub fn progress(&self) -> &LevelProgress {
        &self.progress
    }

    pub fn depth(&self) -> u32 {
        self.dungeon.depth
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        !self.player.is_alive()
    }

    pub fn enemy_at(&self, pos: Position) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.position == pos && e.is_alive())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            depth: self.depth(),
            turn: self.turn,
            dungeon: self.dungeon.clone(),
            player: self.player.clone(),
            enemies: self.enemies.clone(),
            floor_items: self.floor_items.clone(),
            progress: self.progress.clone(),
        }
    }

    /// Resolve one intent.
    pub fn resolve_turn(&mut self, intent: Intent) -> Result<TurnReport, TurnError> {
        if self.is_over() {
            return Err(TurnError::PlayerDead);
        }
        let mut events = Vec::new();

        if !intent.consumes_turn() {
            events.push(TurnEvent::InventoryOpened {
                used: self.player.inventory.used_slots(),
                capacity: self.player.inventory.capacity(),
            });
            return Ok(TurnReport {
                turn: self.turn,
                consumed_turn: false,
                events,
            });
        }

        let mut level_changed = false;
        if self.player.statuses.can_act() {
            level_changed = self.player_action(intent, &mut events)?;
        } else {
            events.push(TurnEvent::PlayerIncapacitated);
        }

        if !level_changed {
            self.enemy_phase(&mut events);
            self.tick_statuses(&mut events);
        }
        self.turn += 1;

        if self.is_over() && !events.iter().any(|e| matches!(e, TurnEvent::PlayerDied)) {
            events.push(TurnEvent::PlayerDied);
            self.progress.record_death();
        }
        Ok(TurnReport {
            turn: self.turn,
            consumed_turn: true,
            events,
        })
    }

    /// Returns whether the player left the level.
    fn player_action(&mut self, intent: Intent, events: &mut Vec<TurnEvent>) -> Result<bool, TurnError> {
        match intent {
            Intent::Move(direction) => self.move_player(direction, events)?,
            Intent::Wait | Intent::OpenInventory => {}
            Intent::UseStairs(direction) => {
                self.use_stairs(direction, events)?;
                return Ok(true);
            }
            Intent::Equip { index, slot } => {
                self.player.inventory.equip(index, slot)?;
                events.push(TurnEvent::Equipped { slot });
            }
            Intent::Unequip(slot) => {
                self.player.inventory.unequip(slot)?;
                events.push(TurnEvent::Unequipped { slot });
            }
            Intent::UseItem { index } => {
                let effect = self.player.use_item(index)?;
                events.push(TurnEvent::ItemUsed(effect));
            }
        }
        Ok(false)
    }

    fn move_player(&mut self, direction: Direction, events: &mut Vec<TurnEvent>) -> Result<(), TurnError> {
        let from = self.player.position;
        let target = from.step(direction);
        if !self.dungeon.in_bounds(target) {
            return Err(TurnError::InvalidTarget(target));
        }

        if let Some(index) = self.enemies.iter().position(|e| e.position == target && e.is_alive()) {
            self.player_attack(index, events);
            return Ok(());
        }
        if !self.dungeon.is_walkable(target) {
            return Err(TurnError::Blocked(target));
        }

        self.player.position = target;
        events.push(TurnEvent::PlayerMoved { from, to: target });
        self.pick_up_items(events);

        match self.dungeon.kind_at(target) {
            Some(TileKind::Trap) => {
                let damage = TRAP_BASE_DAMAGE + TRAP_DAMAGE_PER_DEPTH * self.depth();
                let dealt = self.player.health.apply_damage(damage);
                debug!(damage = dealt, "trap triggered");
                events.push(TurnEvent::TrapTriggered { damage: dealt });
            }
            Some(TileKind::Hazard) => {
                self.player
                    .statuses
                    .apply(StatusEffect::new(StatusType::Burning, HAZARD_BURN_TURNS));
                events.push(TurnEvent::HazardEntered {
                    effect: StatusType::Burning,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn player_attack(&mut self, index: usize, events: &mut Vec<TurnEvent>) {
        let profile = AttackerProfile::of(&self.player);
        let weapon = self.player.inventory.equipment.weapon_mut();
        let exchange = resolve_exchange(
            &profile,
            weapon,
            &mut self.enemies[index],
            &self.config.combat,
            &mut self.rng,
        );
        let killed = exchange.defender_killed;
        events.push(TurnEvent::PlayerAttacked(exchange));
        if killed {
            self.award_kill(index, events);
        }
    }

    /// Remove a dead enemy and pay out its XP, gold and loot.
    fn award_kill(&mut self, index: usize, events: &mut Vec<TurnEvent>) {
        let enemy = self.enemies.remove(index);
        let drop = loot::roll_enemy_drop(&enemy, &mut self.rng);
        self.player.gold = self.player.gold.saturating_add(drop.gold);
        events.push(TurnEvent::EnemyKilled {
            enemy_id: enemy.id,
            name: enemy.name.clone(),
            xp: enemy.xp_reward,
            gold: drop.gold,
        });
        for level_up in self.player.gain_experience(enemy.xp_reward, &mut self.rng) {
            events.push(TurnEvent::LevelUp(level_up));
        }
        for item in drop.items {
            events.push(TurnEvent::LootDropped {
                position: enemy.position,
                item: item.display_name(),
            });
            self.floor_items.push(PlacedItem {
                position: enemy.position,
                item,
            });
        }
    }

    fn pick_up_items(&mut self, events: &mut Vec<TurnEvent>) {
        let here = self.player.position;
        let mut index = 0;
        while index < self.floor_items.len() {
            if self.floor_items[index].position != here {
                index += 1;
                continue;
            }
            let item = self.floor_items[index].item.clone();
            let name = item.display_name();
            let quantity = item.quantity;
            match self.player.inventory.add(item) {
                Ok(()) => {
                    self.floor_items.remove(index);
                    events.push(TurnEvent::ItemPickedUp { item: name, quantity });
                }
                Err(_) => {
                    events.push(TurnEvent::PickupFailed { item: name });
                    index += 1;
                }
            }
        }
    }

    fn use_stairs(&mut self, direction: StairDirection, events: &mut Vec<TurnEvent>) -> Result<(), TurnError> {
        let wanted = match direction {
            StairDirection::Down => TileKind::StairsDown,
            StairDirection::Up => TileKind::StairsUp,
        };
        if self.dungeon.kind_at(self.player.position) != Some(wanted) {
            return Err(TurnError::NotOnStairs(direction.label()));
        }
        let depth = self
            .progress
            .target_depth(direction)
            .ok_or(TurnError::NotOnStairs(direction.label()))?;

        let (dungeon, enemies, floor_items) = Self::build_level(&self.config, &self.progress, depth)
            .map_err(|e| TurnError::LevelGeneration(e.to_string()))?;

        self.player.position = match direction {
            StairDirection::Down => dungeon.spawn,
            StairDirection::Up => dungeon.stairs_down,
        };
        self.dungeon = dungeon;
        self.enemies = enemies;
        self.floor_items = floor_items;
        self.progress.enter(depth);
        events.push(TurnEvent::LevelChanged { depth, direction });
        Ok(())
    }

    fn enemy_phase(&mut self, events: &mut Vec<TurnEvent>) {
        if self.is_over() {
            return;
        }
        let occupied: HashSet<Position> = self
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| e.position)
            .collect();
        let decisions = {
            let ctx = AiContext {
                dungeon: &self.dungeon,
                player: self.player.position,
                occupied: &occupied,
            };
            plan_turn(&self.enemies, &ctx)
        };

        for decision in decisions {
            let Some(index) = self.enemies.iter().position(|e| e.id == decision.enemy_id) else {
                continue;
            };
            let enemy = &mut self.enemies[index];
            if enemy.ai_state != decision.state {
                events.push(TurnEvent::EnemyStateChanged {
                    enemy_id: enemy.id,
                    from: enemy.ai_state,
                    to: decision.state,
                });
                enemy.ai_state = decision.state;
            }
            if enemy.ai_state.is_fleeing() {
                let amount = enemy.health.heal(enemy.ai_config.regen_per_turn);
                if amount > 0 {
                    events.push(TurnEvent::EnemyRegenerated {
                        enemy_id: enemy.id,
                        amount,
                    });
                }
            }

            match decision.action {
                AiAction::Wait => {}
                AiAction::MoveTo(to) => {
                    // earlier movers this turn may have taken the tile
                    let taken = to == self.player.position
                        || self.enemies.iter().any(|e| e.position == to && e.is_alive());
                    if !taken {
                        let enemy = &mut self.enemies[index];
                        let from = enemy.position;
                        enemy.position = to;
                        events.push(TurnEvent::EnemyMoved {
                            enemy_id: enemy.id,
                            from,
                            to,
                        });
                    }
                }
                AiAction::AttackPlayer => {
                    if self.enemies[index].position.chebyshev(self.player.position) > 1 {
                        continue;
                    }
                    let profile = AttackerProfile::of(&self.enemies[index]);
                    let exchange = resolve_exchange(
                        &profile,
                        None,
                        &mut self.player,
                        &self.config.combat,
                        &mut self.rng,
                    );
                    let killed = exchange.defender_killed;
                    events.push(TurnEvent::EnemyAttacked {
                        enemy_id: decision.enemy_id,
                        exchange,
                    });
                    if killed {
                        info!(depth = self.depth(), turn = self.turn, "player died");
                        events.push(TurnEvent::PlayerDied);
                        self.progress.record_death();
                        return;
                    }
                }
            }
        }
    }

    fn tick_statuses(&mut self, events: &mut Vec<TurnEvent>) {
        if self.is_over() {
            return;
        }
        for tick in self.player.statuses.tick(&mut self.player.health) {
            if tick.damage > 0 {
                events.push(TurnEvent::StatusDamage {
                    target: self.player.name.clone(),
                    effect: tick.effect_type,
                    damage: tick.damage,
                });
            }
        }

        let mut index = 0;
        while index < self.enemies.len() {
            let enemy = &mut self.enemies[index];
            for tick in enemy.statuses.tick(&mut enemy.health) {
                if tick.damage > 0 {
                    events.push(TurnEvent::StatusDamage {
                        target: enemy.name.clone(),
                        effect: tick.effect_type,
                        damage: tick.damage,
                    });
                }
            }
            if self.enemies[index].is_alive() {
                index += 1;
            } else {
                self.award_kill(index, events);
            }
        }
    }

    /// Equip the first carried item that fits `slot`.
    pub fn equip_best_fit(&mut self, slot: EquipSlot) -> Result<TurnReport, TurnError> {
        let index = self
            .player
            .inventory
            .find(|item| item.equip_slot() == Some(slot))
            .ok_or(TurnError::InvalidTarget(self.player.position))?;
        self.resolve_turn(Intent::Equip { index, slot })
    }
}
