//! Rooms-and-corridors dungeon layout generator.
//!
//! Rooms are placed by bounded rejection sampling, each new room is joined
//! to its predecessor with an L-shaped corridor, then a few extra loop
//! corridors are added. Connectivity holds by construction.

use std::collections::{BTreeSet, HashSet, VecDeque};

use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::{STAIRS_MIN_SPAWN_GAP, STAIRS_PLACEMENT_ATTEMPTS};
use crate::engine::config::GameConfig;
use crate::entity::Position;
use crate::error::{ConfigError, PlacementExhausted};
use crate::rng::GameRng;

/// Tile types that can appear in a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    Door,
    StairsDown,
    StairsUp,
    Trap,
    Hazard,
}

impl TileKind {
    pub fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    pub fn is_stairs(self) -> bool {
        matches!(self, Self::StairsDown | Self::StairsUp)
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Floor => '.',
            Self::Door => '+',
            Self::StairsDown => '>',
            Self::StairsUp => '<',
            Self::Trap => '^',
            Self::Hazard => '~',
        }
    }
}

/// Which structure a tile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileOwner {
    Solid,
    Room(usize),
    Corridor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub owner: TileOwner,
    /// Fog of war; only the presentation layer flips this
    pub explored: bool,
}

impl Tile {
    const SOLID: Tile = Tile {
        kind: TileKind::Wall,
        owner: TileOwner::Solid,
        explored: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Normal,
    Combat,
    Treasure,
    Puzzle,
    Boss,
}

/// A rectangular room; every tile inside is floor when carved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub room_type: RoomType,
}

impl Room {
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x && pos.x < self.x + self.width && pos.y >= self.y && pos.y < self.y + self.height
    }

    /// Overlap test that also rejects rooms closer than one wall tile.
    pub fn intersects_with_margin(&self, other: &Room) -> bool {
        self.x < other.x + other.width + 1
            && self.x + self.width + 1 > other.x
            && self.y < other.y + other.height + 1
            && self.y + self.height + 1 > other.y
    }

    /// Row-major tile coordinates
    pub fn tiles(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| Position::new(x, y)))
    }

    pub fn area(&self) -> usize {
        (self.width * self.height) as usize
    }

    pub fn random_tile(&self, rng: &mut GameRng) -> Position {
        Position::new(
            rng.range_inclusive(self.x, self.x + self.width - 1),
            rng.range_inclusive(self.y, self.y + self.height - 1),
        )
    }
}

/// Generated level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub width: usize,
    pub height: usize,
    pub depth: u32,
    tiles: Vec<Tile>,
    pub rooms: Vec<Room>,
    pub corridors: BTreeSet<Position>,
    /// Room index pairs joined by a corridor
    pub connections: Vec<(usize, usize)>,
    pub stairs_down: Position,
    pub stairs_up: Option<Position>,
    pub spawn: Position,
}

impl Dungeon {
    fn solid(width: usize, height: usize, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
            tiles: vec![Tile::SOLID; width * height],
            rooms: Vec::new(),
            corridors: BTreeSet::new(),
            connections: Vec::new(),
            stairs_down: Position::new(0, 0),
            stairs_up: None,
            spawn: Position::new(0, 0),
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width + pos.x as usize)
    }

    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|i| &self.tiles[i])
    }

    fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.index(pos).map(move |i| &mut self.tiles[i])
    }

    fn set_kind(&mut self, pos: Position, kind: TileKind) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.kind = kind;
        }
    }

    pub fn kind_at(&self, pos: Position) -> Option<TileKind> {
        self.tile(pos).map(|t| t.kind)
    }

    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(|t| t.kind.is_walkable())
    }

    pub fn room_at(&self, pos: Position) -> Option<usize> {
        match self.tile(pos)?.owner {
            TileOwner::Room(i) => Some(i),
            _ => None,
        }
    }

    /// Row-major iterator over all tiles with their positions
    pub fn tiles(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        self.tiles.iter().enumerate().map(move |(i, t)| {
            let pos = Position::new((i % self.width) as i32, (i / self.width) as i32);
            (pos, t)
        })
    }

    /// Mark tiles within `radius` (Chebyshev) of `center` as explored.
    pub fn reveal_around(&mut self, center: Position, radius: u32) {
        let r = radius as i32;
        for y in center.y - r..=center.y + r {
            for x in center.x - r..=center.x + r {
                if let Some(tile) = self.tile_mut(Position::new(x, y)) {
                    tile.explored = true;
                }
            }
        }
    }

    pub fn explored_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.explored).count()
    }

    /// Room connectivity graph: one node per room, one edge per corridor.
    pub fn room_graph(&self) -> UnGraph<usize, ()> {
        let mut graph = UnGraph::new_undirected();
        let nodes: Vec<_> = (0..self.rooms.len()).map(|i| graph.add_node(i)).collect();
        for &(a, b) in &self.connections {
            if let (Some(&na), Some(&nb)) = (nodes.get(a), nodes.get(b)) {
                graph.add_edge(na, nb, ());
            }
        }
        graph
    }

    pub fn is_connected(&self) -> bool {
        self.rooms.is_empty() || connected_components(&self.room_graph()) == 1
    }

    /// Walkable tiles reachable from `start` by orthogonal steps.
    pub fn reachable_from(&self, start: Position) -> HashSet<Position> {
        let mut seen = HashSet::new();
        if !self.is_walkable(start) {
            return seen;
        }
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(pos) = queue.pop_front() {
            for next in pos.cardinal_neighbors() {
                if self.is_walkable(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Shortest orthogonal walkable path, both ends included.
    pub fn find_path(&self, from: Position, to: Position) -> Option<Vec<Position>> {
        if !self.is_walkable(from) || !self.is_walkable(to) {
            return None;
        }
        let mut came_from = vec![None; self.tiles.len()];
        let start = self.index(from)?;
        let goal = self.index(to)?;
        let mut visited = vec![false; self.tiles.len()];
        visited[start] = true;
        let mut queue = VecDeque::from([from]);

        while let Some(pos) = queue.pop_front() {
            if pos == to {
                break;
            }
            for next in pos.cardinal_neighbors() {
                if let Some(i) = self.index(next) {
                    if !visited[i] && self.tiles[i].kind.is_walkable() {
                        visited[i] = true;
                        came_from[i] = Some(pos);
                        queue.push_back(next);
                    }
                }
            }
        }

        if !visited[goal] {
            return None;
        }
        let mut path = vec![to];
        let mut cursor = to;
        while cursor != from {
            cursor = self.index(cursor).and_then(|i| came_from[i])?;
            path.push(cursor);
        }
        path.reverse();
        Some(path)
    }

    /// Nearest tile to `center` (ring by ring, fixed order) matching `pred`.
    pub fn spiral_search(&self, center: Position, pred: impl Fn(Position, &Tile) -> bool) -> Option<Position> {
        let max_radius = self.width.max(self.height) as i32;
        for r in 1..=max_radius {
            let ring = (-r..=r)
                .map(|dx| center.offset(dx, -r))
                .chain((-r + 1..=r).map(|dy| center.offset(r, dy)))
                .chain((-r..r).rev().map(|dx| center.offset(dx, r)))
                .chain((-r + 1..r).rev().map(|dy| center.offset(-r, dy)));
            for pos in ring {
                if let Some(tile) = self.tile(pos) {
                    if pred(pos, tile) {
                        return Some(pos);
                    }
                }
            }
        }
        None
    }

    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for (pos, tile) in self.tiles() {
            out.push(tile.kind.glyph());
            if pos.x as usize == self.width - 1 {
                out.push('\n');
            }
        }
        out
    }

    fn carve_room(&mut self, index: usize) {
        let room = self.rooms[index].clone();
        for pos in room.tiles() {
            if let Some(tile) = self.tile_mut(pos) {
                tile.kind = TileKind::Floor;
                tile.owner = TileOwner::Room(index);
            }
        }
    }

    /// L-shaped corridor between room centres. Corridor cells that step
    /// into a room become doors.
    fn connect(&mut self, a: usize, b: usize, horizontal_first: bool) {
        let from = self.rooms[a].center();
        let to = self.rooms[b].center();
        let corner = if horizontal_first {
            Position::new(to.x, from.y)
        } else {
            Position::new(from.x, to.y)
        };
        let mut path = straight_run(from, corner);
        path.extend(straight_run(corner, to).into_iter().skip(1));

        for &pos in &path {
            if let Some(tile) = self.tile_mut(pos) {
                if tile.kind == TileKind::Wall {
                    tile.kind = TileKind::Floor;
                    tile.owner = TileOwner::Corridor;
                    self.corridors.insert(pos);
                }
            }
        }
        for pair in path.windows(2) {
            let owners = (self.tile(pair[0]).map(|t| t.owner), self.tile(pair[1]).map(|t| t.owner));
            let door = match owners {
                (Some(TileOwner::Room(_)), Some(TileOwner::Corridor)) => pair[1],
                (Some(TileOwner::Corridor), Some(TileOwner::Room(_))) => pair[0],
                _ => continue,
            };
            if self.kind_at(door) == Some(TileKind::Floor) {
                self.set_kind(door, TileKind::Door);
            }
        }
        self.connections.push((a, b));
    }
}

/// Inclusive straight line along one axis
#[cfg(test)]
impl Dungeon {
    /// Walled rectangle whose interior is one open room.
    pub(crate) fn open_arena(width: usize, height: usize) -> Self {
        let mut dungeon = Self::solid(width, height, 1);
        dungeon.rooms.push(Room {
            x: 1,
            y: 1,
            width: width as i32 - 2,
            height: height as i32 - 2,
            room_type: RoomType::Normal,
        });
        dungeon.carve_room(0);
        dungeon.spawn = Position::new(1, 1);
        dungeon
    }
}

fn straight_run(from: Position, to: Position) -> Vec<Position> {
    if from.y == to.y {
        let step = if to.x >= from.x { 1 } else { -1 };
        let len = from.x.abs_diff(to.x) as i32;
        (0..=len).map(|i| Position::new(from.x + i * step, from.y)).collect()
    } else {
        let step = if to.y >= from.y { 1 } else { -1 };
        let len = from.y.abs_diff(to.y) as i32;
        (0..=len).map(|i| Position::new(from.x, from.y + i * step)).collect()
    }
}

/// Rejection-sample non-overlapping rooms within the retry budget.
fn place_rooms(config: &GameConfig, rng: &mut GameRng) -> Vec<Room> {
    let map_w = config.map.width as i32;
    let map_h = config.map.height as i32;
    let target = rng.range_inclusive(config.rooms.min, config.rooms.max);
    let max_w = (config.room_size.max as i32).min(map_w - 2);
    let max_h = (config.room_size.max as i32).min(map_h - 2);
    let min_edge = config.room_size.min as i32;

    let mut rooms: Vec<Room> = Vec::with_capacity(target);
    let mut attempts = 0;
    while rooms.len() < target && attempts < config.room_attempts {
        attempts += 1;

        let w = rng.range_inclusive(min_edge, max_w);
        let h = rng.range_inclusive(min_edge, max_h);
        let x = rng.range_inclusive(1, map_w - w - 1);
        let y = rng.range_inclusive(1, map_h - h - 1);
        let candidate = Room {
            x,
            y,
            width: w,
            height: h,
            room_type: RoomType::Normal,
        };

        if rooms.iter().any(|r| r.intersects_with_margin(&candidate)) {
            continue;
        }
        rooms.push(candidate);
    }

    if rooms.len() < target {
        let shortfall = PlacementExhausted {
            what: "rooms",
            requested: target,
            placed: rooms.len(),
            attempts,
        };
        let floor = config.rooms.min.min(config.room_fallback_floor);
        if rooms.len() >= floor {
            debug!("{shortfall}; accepted (fallback floor {floor})");
        } else {
            warn!("{shortfall}; below fallback floor {floor}");
        }
    }

    if rooms.is_empty() {
        rooms.push(Room {
            x: (map_w - min_edge) / 2,
            y: (map_h - min_edge) / 2,
            width: min_edge,
            height: min_edge,
            room_type: RoomType::Normal,
        });
    }
    rooms
}

fn assign_room_types(rooms: &mut [Room], depth: u32, rng: &mut GameRng) {
    let mut boss_placed = false;
    for room in rooms.iter_mut().skip(1) {
        let mut table = vec![
            (RoomType::Combat, 40.0),
            (RoomType::Normal, 25.0),
            (RoomType::Treasure, 15.0),
            (RoomType::Puzzle, 12.0),
        ];
        if depth >= 3 && !boss_placed {
            table.push((RoomType::Boss, 8.0));
        }
        room.room_type = rng.weighted_choice(&table).unwrap_or(RoomType::Normal);
        boss_placed |= room.room_type == RoomType::Boss;
    }
    if let Some(first) = rooms.first_mut() {
        first.room_type = RoomType::Normal;
    }
}

fn place_stairs_down(dungeon: &Dungeon, radius: u32, rng: &mut GameRng) -> Position {
    let spawn = dungeon.spawn;
    let legal = |pos: Position| {
        pos.chebyshev(spawn) >= STAIRS_MIN_SPAWN_GAP
            && pos.manhattan(spawn) >= radius
            && dungeon.kind_at(pos) == Some(TileKind::Floor)
            && dungeon.room_at(pos).is_some()
    };

    let mut candidates: Vec<usize> = (1..dungeon.rooms.len()).collect();
    rng.shuffle(&mut candidates);
    for index in candidates {
        let room = &dungeon.rooms[index];
        if legal(room.center()) {
            return room.center();
        }
        for _ in 0..STAIRS_PLACEMENT_ATTEMPTS {
            let pos = room.random_tile(rng);
            if legal(pos) {
                return pos;
            }
        }
    }

    // Single room or every sample rejected: farthest room tile outside the spawn 3x3.
    dungeon
        .rooms
        .iter()
        .flat_map(Room::tiles)
        .filter(|&pos| {
            pos.chebyshev(spawn) >= STAIRS_MIN_SPAWN_GAP && dungeon.kind_at(pos) == Some(TileKind::Floor)
        })
        .fold(None, |best: Option<Position>, pos| match best {
            Some(b) if b.manhattan(spawn) >= pos.manhattan(spawn) => Some(b),
            _ => Some(pos),
        })
        .unwrap_or(spawn)
}

fn place_stairs_up(dungeon: &Dungeon) -> Option<Position> {
    let room = dungeon.rooms.first()?;
    let center = room.center();
    room.tiles()
        .filter(|&pos| pos != center && dungeon.kind_at(pos) == Some(TileKind::Floor))
        .fold(None, |best: Option<Position>, pos| match best {
            Some(b) if b.manhattan(center) <= pos.manhattan(center) => Some(b),
            _ => Some(pos),
        })
}

/// Try a few random tiles in `room` for a special tile.
fn scatter_feature(dungeon: &mut Dungeon, room_index: usize, kind: TileKind, rng: &mut GameRng) -> bool {
    let room = dungeon.rooms[room_index].clone();
    let center = room.center();
    for _ in 0..STAIRS_PLACEMENT_ATTEMPTS {
        let pos = room.random_tile(rng);
        if pos != center && pos != dungeon.spawn && dungeon.kind_at(pos) == Some(TileKind::Floor) {
            dungeon.set_kind(pos, kind);
            return true;
        }
    }
    false
}

/// Generate one level. Fails only on invalid configuration.
pub fn generate_dungeon(config: &GameConfig, depth: u32, rng: &mut GameRng) -> Result<Dungeon, ConfigError> {
    config.validate()?;
    let depth = depth.max(1);
    let tier = config
        .difficulty
        .tier_for(depth)
        .ok_or(ConfigError::EmptyDifficultyTable)?;

    let mut dungeon = Dungeon::solid(config.map.width, config.map.height, depth);

    // Phase 1: rooms
    dungeon.rooms = place_rooms(config, rng);
    assign_room_types(&mut dungeon.rooms, depth, rng);
    for i in 0..dungeon.rooms.len() {
        dungeon.carve_room(i);
    }

    // Phase 2: corridors, chain then loops
    for i in 1..dungeon.rooms.len() {
        let horizontal_first = rng.coin_flip();
        dungeon.connect(i - 1, i, horizontal_first);
    }
    let room_count = dungeon.rooms.len();
    for _ in 0..room_count / 3 {
        let a = rng.range_inclusive(0, room_count - 1);
        let b = rng.range_inclusive(0, room_count - 1);
        let known = dungeon
            .connections
            .iter()
            .any(|&(x, y)| (x, y) == (a, b) || (x, y) == (b, a));
        if a != b && !known {
            let horizontal_first = rng.coin_flip();
            dungeon.connect(a, b, horizontal_first);
        }
    }

    // Phase 3: spawn and stairs
    dungeon.spawn = dungeon.rooms[0].center();
    dungeon.stairs_down = place_stairs_down(&dungeon, config.spawn_safety_radius, rng);
    dungeon.set_kind(dungeon.stairs_down, TileKind::StairsDown);
    if depth > 1 {
        dungeon.stairs_up = place_stairs_up(&dungeon);
        if let Some(up) = dungeon.stairs_up {
            dungeon.set_kind(up, TileKind::StairsUp);
        }
    }
    if dungeon.kind_at(dungeon.spawn).is_some_and(TileKind::is_stairs) {
        if let Some(pos) = dungeon.spiral_search(dungeon.spawn, |_, t| {
            t.kind.is_walkable() && !t.kind.is_stairs()
        }) {
            dungeon.spawn = pos;
        }
    }

    // Phase 4: traps and hazards
    for i in 1..dungeon.rooms.len() {
        if rng.chance(tier.trap_chance) {
            scatter_feature(&mut dungeon, i, TileKind::Trap, rng);
        }
        let room_type = dungeon.rooms[i].room_type;
        if matches!(room_type, RoomType::Boss | RoomType::Puzzle) && rng.chance(tier.hazard_chance) {
            scatter_feature(&mut dungeon, i, TileKind::Hazard, rng);
        }
    }

    info!(
        depth,
        rooms = dungeon.rooms.len(),
        corridors = dungeon.corridors.len(),
        "dungeon generated"
    );
    Ok(dungeon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{CountRange, MapBounds};

    fn config() -> GameConfig {
        GameConfig {
            map: MapBounds { width: 40, height: 30 },
            rooms: CountRange { min: 6, max: 8 },
            room_size: CountRange { min: 4, max: 7 },
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_generate_deterministic() {
        let a = generate_dungeon(&config(), 1, &mut GameRng::seeded(42)).unwrap();
        let b = generate_dungeon(&config(), 1, &mut GameRng::seeded(42)).unwrap();
        assert_eq!(a, b, "Same seed must produce same layout");
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_dungeon(&config(), 1, &mut GameRng::seeded(1)).unwrap();
        let b = generate_dungeon(&config(), 1, &mut GameRng::seeded(2)).unwrap();
        assert_ne!(a.to_ascii(), b.to_ascii(), "Different seeds should differ");
    }

    #[test]
    fn test_rooms_do_not_overlap() {
        let d = generate_dungeon(&config(), 2, &mut GameRng::seeded(5)).unwrap();
        for (i, a) in d.rooms.iter().enumerate() {
            for b in d.rooms.iter().skip(i + 1) {
                assert!(!a.intersects_with_margin(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_every_room_reachable_from_spawn() {
        for seed in 0..20 {
            let d = generate_dungeon(&config(), 3, &mut GameRng::seeded(seed)).unwrap();
            let reachable = d.reachable_from(d.spawn);
            for room in &d.rooms {
                assert!(reachable.contains(&room.center()), "seed {seed}: {room:?} unreachable");
            }
            assert!(d.is_connected());
            assert!(reachable.contains(&d.stairs_down));
        }
    }

    #[test]
    fn test_single_stairs_down_and_safe_spawn() {
        let cfg = config();
        for seed in 0..20 {
            let d = generate_dungeon(&cfg, 1, &mut GameRng::seeded(seed)).unwrap();
            let count = d.tiles().filter(|(_, t)| t.kind == TileKind::StairsDown).count();
            assert_eq!(count, 1);
            assert!(d.spawn.manhattan(d.stairs_down) >= cfg.spawn_safety_radius);
            assert!(!d.kind_at(d.spawn).is_some_and(TileKind::is_stairs));
            assert!(d.stairs_up.is_none(), "no stairs up on depth 1");
        }
    }

    #[test]
    fn test_stairs_up_below_first_level() {
        let d = generate_dungeon(&config(), 4, &mut GameRng::seeded(9)).unwrap();
        let up = d.stairs_up.expect("depth 4 has stairs up");
        assert_eq!(d.kind_at(up), Some(TileKind::StairsUp));
        assert_eq!(d.room_at(up), Some(0));
        assert_ne!(up, d.spawn);
    }

    #[test]
    fn test_single_room_dungeon() {
        let cfg = GameConfig {
            rooms: CountRange { min: 1, max: 1 },
            ..config()
        };
        let d = generate_dungeon(&cfg, 2, &mut GameRng::seeded(3)).unwrap();
        assert_eq!(d.rooms.len(), 1);
        assert!(d.spawn.manhattan(d.stairs_down) >= cfg.spawn_safety_radius);
        assert_ne!(d.spawn, d.stairs_down);
    }

    #[test]
    fn test_smallest_single_room_keeps_stairs_out_of_spawn_neighbourhood() {
        for radius in 0..=3 {
            let cfg = GameConfig {
                rooms: CountRange { min: 1, max: 1 },
                room_size: CountRange { min: 4, max: 4 },
                spawn_safety_radius: radius,
                ..config()
            };
            for seed in 0..20 {
                let d = generate_dungeon(&cfg, 2, &mut GameRng::seeded(seed)).unwrap();
                assert!(
                    d.spawn.chebyshev(d.stairs_down) >= 2,
                    "radius {radius} seed {seed}: stairs {:?} next to spawn {:?}",
                    d.stairs_down,
                    d.spawn
                );
                assert!(d.spawn.manhattan(d.stairs_down) >= radius);
            }
        }
    }

    #[test]
    fn test_diagonal_neighbour_never_holds_stairs() {
        let cfg = GameConfig {
            spawn_safety_radius: 2,
            room_size: CountRange { min: 4, max: 5 },
            ..config()
        };
        for seed in 0..40 {
            let d = generate_dungeon(&cfg, 1, &mut GameRng::seeded(seed)).unwrap();
            assert!(d.spawn.chebyshev(d.stairs_down) >= 2, "seed {seed}");
        }
    }

    #[test]
    fn test_retry_exhaustion_still_returns_a_room() {
        let cfg = GameConfig {
            map: MapBounds { width: 8, height: 8 },
            rooms: CountRange { min: 5, max: 5 },
            room_size: CountRange { min: 4, max: 5 },
            room_attempts: 10,
            ..GameConfig::default()
        };
        let d = generate_dungeon(&cfg, 1, &mut GameRng::seeded(0)).unwrap();
        assert!(!d.rooms.is_empty());
        assert!(d.is_connected());
    }

    #[test]
    fn test_first_room_is_normal_and_at_most_one_boss() {
        for seed in 0..20 {
            let d = generate_dungeon(&config(), 5, &mut GameRng::seeded(seed)).unwrap();
            assert_eq!(d.rooms[0].room_type, RoomType::Normal);
            let bosses = d.rooms.iter().filter(|r| r.room_type == RoomType::Boss).count();
            assert!(bosses <= 1);
        }
        let shallow = generate_dungeon(&config(), 1, &mut GameRng::seeded(4)).unwrap();
        assert!(shallow.rooms.iter().all(|r| r.room_type != RoomType::Boss));
    }

    #[test]
    fn test_find_path_between_rooms() {
        let d = generate_dungeon(&config(), 1, &mut GameRng::seeded(11)).unwrap();
        let path = d.find_path(d.spawn, d.stairs_down).expect("stairs reachable");
        assert_eq!(path.first(), Some(&d.spawn));
        assert_eq!(path.last(), Some(&d.stairs_down));
        for step in path.windows(2) {
            assert_eq!(step[0].manhattan(step[1]), 1);
        }
        assert!(d.find_path(d.spawn, Position::new(-1, 0)).is_none());
    }

    #[test]
    fn test_reveal_around() {
        let mut d = generate_dungeon(&config(), 1, &mut GameRng::seeded(2)).unwrap();
        assert_eq!(d.explored_count(), 0);
        d.reveal_around(d.spawn, 1);
        assert_eq!(d.explored_count(), 9);
    }

    #[test]
    fn test_spiral_search_nearest_first() {
        let d = generate_dungeon(&config(), 1, &mut GameRng::seeded(2)).unwrap();
        let found = d.spiral_search(d.spawn, |_, t| t.kind.is_walkable());
        assert_eq!(found.map(|p| p.chebyshev(d.spawn)), Some(1));
    }

    #[test]
    fn test_straight_run() {
        let run = straight_run(Position::new(5, 2), Position::new(2, 2));
        assert_eq!(run.len(), 4);
        assert_eq!(run[0], Position::new(5, 2));
        assert_eq!(run[3], Position::new(2, 2));
    }
}
