//! Influence points: the page-element hotspots that bend the shader field.
//!
//! The permanent set is picked once from a geometry snapshot and re-sampled
//! every frame. Transient points only exist while a caller spotlights an
//! element that is not already tracked.

use crate::core::constants::*;
use crate::core::geometry::{Rect, Viewport};
use glam::Vec2;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq)]
pub struct InfluencePoint<E> {
    pub source: Option<E>,
    /// Fractional offset inside the source rectangle that this point follows.
    pub anchor: (f64, f64),
    pub position: Vec2,
    pub footprint: Vec2,
    pub strength: f32,
    pub target_strength: f32,
    pub fade_speed: f32,
    /// Strength a permanent point returns to after a spotlight ends.
    pub rest_strength: f32,
    pub permanent: bool,
    pub glowing: bool,
}

impl<E> InfluencePoint<E> {
    /// Moves the point by one relaxation step.
    #[inline]
    pub fn relax(&mut self, delta_multiplier: f32) {
        self.strength = relax(
            self.strength,
            self.target_strength,
            self.fade_speed,
            delta_multiplier,
        );
    }

    #[inline]
    pub fn is_spent(&self) -> bool {
        !self.permanent && self.target_strength == 0.0 && self.strength < NEGLIGIBLE_STRENGTH
    }

    fn resample(&mut self, rect: &Rect, viewport: Viewport) {
        let (px, py) = rect.point_at(self.anchor.0, self.anchor.1);
        self.position = viewport.normalize(px, py);
        self.footprint = viewport.footprint(rect);
    }
}

/// One relaxation step of `strength` towards `target`. The blend factor is
/// clamped to [0, 1], so the result always lies between the two.
#[inline]
pub fn relax(strength: f32, target: f32, fade_speed: f32, delta_multiplier: f32) -> f32 {
    let k = (fade_speed * delta_multiplier).clamp(0.0, 1.0);
    strength + (target - strength) * k
}

#[derive(Clone, Debug, PartialEq)]
pub struct Candidate<E> {
    pub source: E,
    pub rect: Rect,
    pub anchor: (f64, f64),
    pub priority: f64,
    pub strength_scale: f32,
}

/// Builds registration candidates from an element geometry snapshot.
///
/// Every element large enough to see yields its centre; elements noticeably
/// longer on one axis add two more points along that axis at reduced
/// priority and strength.
pub fn collect_candidates<E: Clone>(elements: &[(E, Rect)]) -> Vec<Candidate<E>> {
    let mut out = Vec::with_capacity(elements.len() * 3);
    for (el, rect) in elements {
        if rect.width <= MIN_ELEMENT_PX || rect.height <= MIN_ELEMENT_PX {
            continue;
        }
        let area = rect.area();
        out.push(Candidate {
            source: el.clone(),
            rect: *rect,
            anchor: (0.5, 0.5),
            priority: area,
            strength_scale: 1.0,
        });

        let wide = rect.width > rect.height * ELONGATION_RATIO;
        let tall = rect.height > rect.width * ELONGATION_RATIO;
        let split = if wide {
            [(SPLIT_NEAR, 0.5), (SPLIT_FAR, 0.5)]
        } else if tall {
            [(0.5, SPLIT_NEAR), (0.5, SPLIT_FAR)]
        } else {
            continue;
        };
        for anchor in split {
            out.push(Candidate {
                source: el.clone(),
                rect: *rect,
                anchor,
                priority: area * SPLIT_PRIORITY_SCALE,
                strength_scale: SPLIT_STRENGTH_SCALE,
            });
        }
    }
    out
}

/// Zero-padded arrays in the layout the fragment shader expects.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Zeroable)]
pub struct PointUniforms {
    /// x, y, strength
    pub attractors: [[f32; 3]; MAX_INFLUENCE_POINTS],
    /// x, y, half width, half height
    pub masks: [[f32; 4]; MAX_INFLUENCE_POINTS],
    /// x, y, strength of glowing points only
    pub glow: [[f32; 3]; MAX_INFLUENCE_POINTS],
    pub active: i32,
    pub glowing: i32,
}

impl Default for PointUniforms {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

impl PointUniforms {
    pub fn attractor_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.attractors[..])
    }

    pub fn mask_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.masks[..])
    }

    pub fn glow_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.glow[..])
    }
}

#[derive(Clone, Debug)]
pub struct InfluenceSet<E> {
    points: SmallVec<[InfluencePoint<E>; MAX_INFLUENCE_POINTS]>,
    capacity: usize,
}

impl<E: Clone + PartialEq> InfluenceSet<E> {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: SmallVec::new(),
            capacity: capacity.min(MAX_INFLUENCE_POINTS),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[InfluencePoint<E>] {
        &self.points
    }

    /// Replaces the set with the highest-priority candidates from `elements`.
    /// Returns the number of candidates considered.
    pub fn register_permanent(&mut self, elements: &[(E, Rect)], viewport: Viewport) -> usize {
        let mut candidates = collect_candidates(elements);
        let total = candidates.len();
        // Stable: equal priorities keep document order.
        candidates.sort_by(|a, b| b.priority.total_cmp(&a.priority));

        self.points.clear();
        for c in candidates.into_iter().take(self.capacity) {
            let rest = BASE_STRENGTH * c.strength_scale;
            let mut point = InfluencePoint {
                source: Some(c.source),
                anchor: c.anchor,
                position: Vec2::ZERO,
                footprint: Vec2::ZERO,
                strength: rest,
                target_strength: rest,
                fade_speed: FALL_SPEED,
                rest_strength: rest,
                permanent: true,
                glowing: false,
            };
            point.resample(&c.rect, viewport);
            self.points.push(point);
        }
        total
    }

    /// Per-frame step: follow layout, relax strengths, drop spent transient
    /// points and enforce capacity. `sample` reports an element's current
    /// rectangle; zero-sized or missing elements keep their last position.
    pub fn update<F>(&mut self, delta_multiplier: f32, viewport: Viewport, mut sample: F)
    where
        F: FnMut(&E) -> Option<Rect>,
    {
        for point in self.points.iter_mut() {
            if let Some(rect) = point.source.as_ref().and_then(&mut sample) {
                if rect.has_size() {
                    point.resample(&rect, viewport);
                }
            }
            point.relax(delta_multiplier);
        }
        self.points.retain(|p| !p.is_spent());
        self.points.truncate(self.capacity);
    }

    /// Raises the point(s) following `element`, or adds a transient point for
    /// it if the set has room. Returns false when nothing could be lit.
    pub fn spotlight(&mut self, element: &E, rect: Option<Rect>, viewport: Viewport) -> bool {
        let mut lit = false;
        for point in self.points.iter_mut() {
            if point.source.as_ref() == Some(element) {
                point.target_strength = SPOTLIGHT_STRENGTH;
                point.fade_speed = RISE_SPEED;
                point.glowing = true;
                lit = true;
            }
        }
        if lit {
            return true;
        }
        let rect = match rect {
            Some(r) if r.has_size() => r,
            _ => return false,
        };
        if self.points.len() >= self.capacity {
            return false;
        }
        let mut point = InfluencePoint {
            source: Some(element.clone()),
            anchor: (0.5, 0.5),
            position: Vec2::ZERO,
            footprint: Vec2::ZERO,
            strength: 0.0,
            target_strength: SPOTLIGHT_STRENGTH,
            fade_speed: RISE_SPEED,
            rest_strength: 0.0,
            permanent: false,
            glowing: true,
        };
        point.resample(&rect, viewport);
        self.points.push(point);
        true
    }

    /// Ends a spotlight: permanent points fall back to rest, transient points
    /// fade out and are removed by a later [`update`](Self::update).
    pub fn release(&mut self, element: &E) {
        for point in self.points.iter_mut() {
            if point.source.as_ref() != Some(element) {
                continue;
            }
            point.glowing = false;
            if point.permanent {
                point.target_strength = point.rest_strength;
                point.fade_speed = FALL_SPEED;
            } else {
                point.target_strength = 0.0;
                point.fade_speed = REMOVE_SPEED;
            }
        }
    }

    /// Writes the live points into `out`, zero-filling every unused slot.
    pub fn pack(&self, out: &mut PointUniforms) {
        let active = self.points.len().min(self.capacity);
        let mut glow_count = 0usize;
        for (i, p) in self.points.iter().take(active).enumerate() {
            out.attractors[i] = [p.position.x, p.position.y, p.strength];
            let half_w = if p.footprint.x > 0.0 {
                p.footprint.x
            } else {
                DEFAULT_FOOTPRINT
            };
            let half_h = if p.footprint.y > 0.0 {
                p.footprint.y
            } else {
                DEFAULT_FOOTPRINT
            };
            out.masks[i] = [p.position.x, p.position.y, half_w, half_h];
            if p.glowing {
                out.glow[glow_count] = [p.position.x, p.position.y, p.strength];
                glow_count += 1;
            }
        }
        for slot in active..MAX_INFLUENCE_POINTS {
            out.attractors[slot] = [0.0; 3];
            out.masks[slot] = [0.0; 4];
        }
        for slot in glow_count..MAX_INFLUENCE_POINTS {
            out.glow[slot] = [0.0; 3];
        }
        out.active = active as i32;
        out.glowing = glow_count as i32;
    }
}
