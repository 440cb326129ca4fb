//! Projectiles and the per-entity set that owns them.
//!
//! A projectile flies in a straight line at constant speed from the shooter's
//! center toward the point it was aimed at. It is removed once it has fully
//! left the arena past any edge, or when it hits the opposing entity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::arena::{Arena, Rect};

/// Identifier of a projectile, unique within its owning set.
pub type ProjectileId = u64;

/// An in-flight projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    id: ProjectileId,
    /// Center of the bounding box.
    position: Vec2,
    /// Unit direction of travel.
    direction: Vec2,
    speed: f32,
    extent: Vec2,
}

impl Projectile {
    /// Builds a projectile at `origin` heading for `target`.
    ///
    /// Returns `None` if `target` coincides with `origin` or the direction
    /// cannot be normalized.
    #[must_use]
    pub fn aimed(
        id: ProjectileId,
        origin: Vec2,
        target: Vec2,
        speed: f32,
        extent: Vec2,
    ) -> Option<Self> {
        let direction = (target - origin).try_normalize()?;
        Some(Self {
            id,
            position: origin,
            direction,
            speed,
            extent,
        })
    }

    /// Identifier within the owning set.
    #[must_use]
    pub fn id(&self) -> ProjectileId {
        self.id
    }

    /// Center of the projectile.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Unit direction of travel.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Distance per unit of `dt`.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Bounding box.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, self.extent)
    }

    fn advance(&mut self, dt: f32) {
        self.position += self.direction * self.speed * dt;
    }
}

/// Live projectiles fired by one entity, in spawn order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSet {
    live: Vec<Projectile>,
    next_id: ProjectileId,
}

impl ProjectileSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a projectile from `origin` toward `target`.
    ///
    /// A degenerate aim (`target == origin`) spawns nothing and returns `None`.
    pub fn spawn(
        &mut self,
        origin: Vec2,
        target: Vec2,
        speed: f32,
        extent: Vec2,
    ) -> Option<&Projectile> {
        let projectile = Projectile::aimed(self.next_id, origin, target, speed, extent)?;
        self.next_id += 1;
        self.live.push(projectile);
        self.live.last()
    }

    /// Moves every projectile by `direction * speed * dt`, then drops those
    /// that left the arena. Returns how many were dropped.
    pub fn advance(&mut self, dt: f32, arena: &Arena) -> usize {
        for projectile in &mut self.live {
            projectile.advance(dt);
        }
        let before = self.live.len();
        self.live.retain(|p| !arena.is_outside(&p.rect()));
        before - self.live.len()
    }

    /// First projectile, in spawn order, overlapping `rect`.
    #[must_use]
    pub fn first_intersecting(&self, rect: &Rect) -> Option<&Projectile> {
        self.live.iter().find(|p| p.rect().intersects(rect))
    }

    /// Removes and returns the first projectile overlapping `rect`.
    pub fn take_first_hit(&mut self, rect: &Rect) -> Option<Projectile> {
        let index = self.live.iter().position(|p| p.rect().intersects(rect))?;
        Some(self.live.remove(index))
    }

    /// Live projectiles in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> + '_ {
        self.live.iter()
    }

    /// Number of live projectiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// True if nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drops every projectile. Ids keep counting up.
    pub fn clear(&mut self) {
        self.live.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENT: Vec2 = Vec2::new(5.0, 10.0);

    fn arena() -> Arena {
        Arena::new(800, 600).unwrap()
    }

    #[test]
    fn spawn_normalizes_direction() {
        let mut set = ProjectileSet::new();
        let p = set
            .spawn(Vec2::ZERO, Vec2::new(3.0, 4.0), 10.0, EXTENT)
            .copied()
            .unwrap();
        assert!((p.direction() - Vec2::new(0.6, 0.8)).length() < 1e-6);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn degenerate_aim_spawns_nothing() {
        let mut set = ProjectileSet::new();
        let origin = Vec2::new(225.0, 275.0);
        assert!(set.spawn(origin, origin, 10.0, EXTENT).is_none());
        assert!(set.is_empty());
        assert!(Projectile::aimed(0, Vec2::ZERO, Vec2::new(f32::NAN, 1.0), 10.0, EXTENT).is_none());
    }

    #[test]
    fn advance_moves_by_speed_and_dt() {
        let mut set = ProjectileSet::new();
        set.spawn(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0), 10.0, EXTENT);
        set.advance(1.0, &arena());
        set.advance(0.5, &arena());
        let p = set.iter().next().unwrap();
        assert_eq!(p.position(), Vec2::new(115.0, 100.0));
    }

    #[test]
    fn projectile_past_right_edge_is_culled() {
        let arena = arena();
        let mut set = ProjectileSet::new();
        set.spawn(Vec2::ZERO, Vec2::new(1.0, 0.0), 10.0, EXTENT);

        // 79 steps: center at x = 790, still inside
        for _ in 0..79 {
            assert_eq!(set.advance(1.0, &arena), 0);
        }
        assert_eq!(set.len(), 1);

        // A large step carries x well past WIDTH
        assert_eq!(set.advance(10.0, &arena), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn projectile_leaving_any_edge_is_culled() {
        let arena = arena();
        let mut set = ProjectileSet::new();
        let center = Vec2::new(400.0, 300.0);
        for target in [
            Vec2::new(400.0, 0.0),
            Vec2::new(400.0, 600.0),
            Vec2::new(0.0, 300.0),
            Vec2::new(800.0, 300.0),
        ] {
            set.spawn(center, target, 10.0, EXTENT);
        }
        assert_eq!(set.advance(100.0, &arena), 4);
    }

    #[test]
    fn take_first_hit_removes_in_spawn_order() {
        let mut set = ProjectileSet::new();
        set.spawn(Vec2::new(110.0, 310.0), Vec2::new(0.0, 310.0), 10.0, EXTENT);
        set.spawn(Vec2::new(120.0, 320.0), Vec2::new(0.0, 320.0), 10.0, EXTENT);
        set.spawn(Vec2::new(700.0, 320.0), Vec2::new(0.0, 320.0), 10.0, EXTENT);

        let target = Rect::from_min_size(Vec2::new(100.0, 300.0), Vec2::splat(50.0));
        assert_eq!(set.first_intersecting(&target).map(Projectile::id), Some(0));
        assert_eq!(set.take_first_hit(&target).map(|p| p.id()), Some(0));
        assert_eq!(set.take_first_hit(&target).map(|p| p.id()), Some(1));
        assert!(set.take_first_hit(&target).is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ids_keep_counting_after_clear() {
        let mut set = ProjectileSet::new();
        set.spawn(Vec2::ZERO, Vec2::X, 1.0, EXTENT);
        set.clear();
        let id = set.spawn(Vec2::ZERO, Vec2::X, 1.0, EXTENT).map(Projectile::id);
        assert_eq!(id, Some(1));
    }
}
