//! Rows of static sensor holds, streamed in and out around the camera.

use std::collections::BTreeMap;

use glam::Vec2;
use swing_engine::{
    BodyDesc, Color, ColliderMaterial, EngineContext, Entity, EntityId, ShapeComponent, WorldView,
};

use crate::config::ClimberConfig;

pub const HOLD_TAG: &str = "hold";

/// A grabbable point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hold {
    pub entity: EntityId,
    pub position: Vec2,
    /// Key of the row this hold belongs to (its Y coordinate).
    pub row_level: i32,
    /// Rows above the start row; the score a catch here is worth.
    pub level: u32,
}

/// The two holds at one height.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldRow {
    pub row_level: i32,
    pub holds: [Hold; 2],
}

/// Owns every hold currently in the world, keyed by row level.
///
/// Keys are multiples of `row_distance`, contiguous from the lowest row to
/// the highest; rows are only ever dropped from the bottom and added at the top.
#[derive(Debug)]
pub struct HoldField {
    rows: BTreeMap<i32, HoldRow>,
    row_distance: i32,
    play_width: f32,
    hold_radius: f32,
    stroke_width: f32,
    stroke: Color,
    initial_fill: f32,
}

impl HoldField {
    pub fn new(config: &ClimberConfig) -> Self {
        Self {
            rows: BTreeMap::new(),
            row_distance: config.row_distance.max(1),
            play_width: config.play_width,
            hold_radius: config.hold_radius,
            stroke_width: config.hold_stroke_width,
            stroke: Color::WHITE,
            initial_fill: config.initial_fill_fraction,
        }
    }

    /// Drop every row and rebuild from row 0 up to `-initial_fill_fraction * viewport_height`.
    pub fn reset_field(&mut self, ctx: &mut EngineContext, viewport_height: f32) {
        self.clear(ctx);

        let top = -self.initial_fill * viewport_height;
        let mut row_level = 0;
        while row_level as f32 >= top {
            self.spawn_row(ctx, row_level);
            row_level -= self.row_distance;
        }
        log::debug!("hold field reset: {} rows", self.rows.len());
    }

    /// Retire rows below `view` and add rows above it, up to one viewport
    /// height past the view top.
    pub fn expand_field(&mut self, ctx: &mut EngineContext, view: &WorldView, viewport_height: f32) {
        let retired: Vec<i32> = self
            .rows
            .keys()
            .rev()
            .copied()
            .take_while(|&key| key as f32 > view.bottom)
            .collect();
        for key in &retired {
            self.despawn_row(ctx, *key);
        }

        let top = view.top - viewport_height;
        let mut row_level = match self.rows.keys().next() {
            Some(&lowest_key) => lowest_key - self.row_distance,
            None => (view.bottom / self.row_distance as f32).floor() as i32 * self.row_distance,
        };

        let mut added = 0;
        while row_level as f32 >= top {
            self.spawn_row(ctx, row_level);
            row_level -= self.row_distance;
            added += 1;
        }

        if added > 0 || !retired.is_empty() {
            log::debug!(
                "hold field: +{} rows, -{} rows, {} live",
                added,
                retired.len(),
                self.rows.len()
            );
        }
    }

    /// Resolve an overlapped entity to the hold it is, if any.
    pub fn hold_at(&self, entity: EntityId) -> Option<Hold> {
        self.rows
            .values()
            .flat_map(|row| row.holds.iter())
            .find(|hold| hold.entity == entity)
            .copied()
    }

    /// Rows by ascending key (highest row first, since Y points down).
    pub fn rows(&self) -> impl Iterator<Item = &HoldRow> {
        self.rows.values()
    }

    pub fn row(&self, row_level: i32) -> Option<&HoldRow> {
        self.rows.get(&row_level)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_distance(&self) -> i32 {
        self.row_distance
    }

    /// Outline color for every current and future hold.
    pub fn set_stroke(&mut self, ctx: &mut EngineContext, stroke: Color) {
        self.stroke = stroke;
        for row in self.rows.values() {
            for hold in &row.holds {
                if let Some(shape) = ctx.scene.get_mut(hold.entity).and_then(|e| e.shape.as_mut()) {
                    shape.stroke = stroke;
                }
            }
        }
    }

    fn clear(&mut self, ctx: &mut EngineContext) {
        let keys: Vec<i32> = self.rows.keys().copied().collect();
        for key in keys {
            self.despawn_row(ctx, key);
        }
    }

    fn spawn_row(&mut self, ctx: &mut EngineContext, row_level: i32) {
        if self.rows.contains_key(&row_level) {
            return;
        }
        let half = self.play_width / 2.0;
        let holds = [
            self.spawn_hold(ctx, Vec2::new(-half, row_level as f32), row_level),
            self.spawn_hold(ctx, Vec2::new(half, row_level as f32), row_level),
        ];
        self.rows.insert(row_level, HoldRow { row_level, holds });
    }

    fn spawn_hold(&self, ctx: &mut EngineContext, position: Vec2, row_level: i32) -> Hold {
        let entity = ctx.next_id();
        let shape = ShapeComponent::circle(self.hold_radius, Color::WHITE)
            .with_stroke(self.stroke, self.stroke_width)
            .with_layer(0);
        ctx.spawn_with_body(
            Entity::new(entity).with_tag(HOLD_TAG).with_shape(shape),
            BodyDesc::static_sensor_circle(position, self.hold_radius),
            ColliderMaterial::default(),
        );
        Hold {
            entity,
            position,
            row_level,
            level: row_level.unsigned_abs() / self.row_distance as u32,
        }
    }

    fn despawn_row(&mut self, ctx: &mut EngineContext, row_level: i32) {
        if let Some(row) = self.rows.remove(&row_level) {
            for hold in row.holds {
                ctx.despawn(hold.entity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup() -> (EngineContext, HoldField) {
        let config = ClimberConfig::default();
        (EngineContext::from_config(&config.game_config()), HoldField::new(&config))
    }

    fn keys(field: &HoldField) -> Vec<i32> {
        field.rows().map(|r| r.row_level).collect()
    }

    fn view(top: f32, bottom: f32) -> WorldView {
        WorldView { left: -250.0, top, right: 250.0, bottom }
    }

    #[test]
    fn reset_field_fills_to_eighty_percent() {
        let (mut ctx, mut field) = setup();
        field.reset_field(&mut ctx, 800.0);
        assert_eq!(keys(&field), vec![-500, -250, 0]);

        field.reset_field(&mut ctx, 1000.0);
        assert_eq!(keys(&field), vec![-750, -500, -250, 0]);
        assert_eq!(ctx.scene.tagged(HOLD_TAG).count(), 8);
        assert_eq!(ctx.physics.body_count(), 8);
    }

    #[test]
    fn rows_have_two_side_holds() {
        let (mut ctx, mut field) = setup();
        field.reset_field(&mut ctx, 800.0);
        for row in field.rows() {
            assert_eq!(row.holds[0].position, Vec2::new(-140.0, row.row_level as f32));
            assert_eq!(row.holds[1].position, Vec2::new(140.0, row.row_level as f32));
        }
        let row = field.row(-500).unwrap();
        assert_eq!(row.holds[0].level, 2);
        assert_eq!(field.row(0).unwrap().holds[1].level, 0);
    }

    #[test]
    fn expand_retires_below_and_fills_above() {
        let (mut ctx, mut field) = setup();
        field.reset_field(&mut ctx, 800.0);

        field.expand_field(&mut ctx, &view(-1160.0, -160.0), 800.0);
        let k = keys(&field);
        assert_eq!(*k.last().unwrap(), -250);
        assert_eq!(*k.first().unwrap(), -1750);
        assert!(k.windows(2).all(|w| w[1] - w[0] == 250));
        assert_eq!(ctx.scene.tagged(HOLD_TAG).count(), k.len() * 2);
    }

    #[test]
    fn expand_is_idempotent() {
        let (mut ctx, mut field) = setup();
        field.reset_field(&mut ctx, 800.0);
        let v = view(-900.0, 100.0);
        field.expand_field(&mut ctx, &v, 800.0);
        let before: Vec<HoldRow> = field.rows().cloned().collect();
        field.expand_field(&mut ctx, &v, 800.0);
        let after: Vec<HoldRow> = field.rows().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn shrinking_view_keeps_rows_above_fill_line() {
        let (mut ctx, mut field) = setup();
        field.reset_field(&mut ctx, 300.0);
        field.expand_field(&mut ctx, &view(-1425.2, 300.0), 300.0);
        assert_eq!(keys(&field).first(), Some(&-1500));

        // the fill line drops back to -400; nothing above it is retired
        field.expand_field(&mut ctx, &view(-100.0, 300.0), 300.0);
        let k = keys(&field);
        assert_eq!(k.first(), Some(&-1500));
        assert_eq!(k.last(), Some(&0));
        assert!(k.windows(2).all(|w| w[1] - w[0] == 250));
        assert!(((k[0] - 250) as f32) < -400.0);
        assert_eq!(ctx.scene.tagged(HOLD_TAG).count(), k.len() * 2);
    }

    #[test]
    fn empty_field_restarts_at_view_bottom() {
        let (mut ctx, mut field) = setup();
        field.expand_field(&mut ctx, &view(-1100.0, -130.0), 800.0);
        let k = keys(&field);
        assert_eq!(*k.last().unwrap(), -250);
        assert_eq!(*k.first().unwrap(), -1750);
    }

    #[test]
    fn hold_at_resolves_entities() {
        let (mut ctx, mut field) = setup();
        field.reset_field(&mut ctx, 800.0);
        let hold = field.row(-250).unwrap().holds[1];
        assert_eq!(field.hold_at(hold.entity), Some(hold));
        assert_eq!(field.hold_at(EntityId(9999)), None);
    }

    #[test]
    fn set_stroke_recolors_holds() {
        let (mut ctx, mut field) = setup();
        field.reset_field(&mut ctx, 800.0);
        let red = Color::rgb(1.0, 0.0, 0.0);
        field.set_stroke(&mut ctx, red);
        assert!(ctx
            .scene
            .tagged(HOLD_TAG)
            .all(|e| e.shape.map(|s| s.stroke) == Some(red)));

        // rows spawned later pick up the current stroke
        field.expand_field(&mut ctx, &view(-2000.0, -1000.0), 800.0);
        assert!(ctx
            .scene
            .tagged(HOLD_TAG)
            .all(|e| e.shape.map(|s| s.stroke) == Some(red)));
    }

    proptest! {
        #[test]
        fn expand_keeps_window_invariants(
            steps in prop::collection::vec((0.0..3000.0_f32, 400.0..2000.0_f32), 1..6),
            viewport_height in 300.0..1500.0_f32,
        ) {
            let (mut ctx, mut field) = setup();
            field.reset_field(&mut ctx, viewport_height);

            // a view that keeps climbing, like the camera during a run
            let mut bottom = 300.0;
            for (climb, height) in steps {
                bottom -= climb;
                let v = view(bottom - height, bottom);
                field.expand_field(&mut ctx, &v, viewport_height);

                let k = keys(&field);
                prop_assert!(!k.is_empty());
                prop_assert!(k.iter().all(|&key| key as f32 <= v.bottom), "row below view: {:?}", k);
                prop_assert!(k.windows(2).all(|w| w[1] - w[0] == 250), "gap in {:?}", k);
                prop_assert!(k.iter().all(|key| key % 250 == 0));
                // no missing row up to the fill line; rows above it from a
                // taller earlier view are kept
                prop_assert!(((k[0] - 250) as f32) < v.top - viewport_height);
                prop_assert_eq!(ctx.scene.tagged(HOLD_TAG).count(), k.len() * 2);
            }
        }
    }
}
