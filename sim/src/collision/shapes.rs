use glam::Vec2;

/// An axis-aligned collider shape, positioned by the entity that carries it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

/// Whether a collider physically resolves or only reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderKind {
    /// Participates in overlap detection and velocity resolution.
    Solid,
    /// Reports overlap events but never produces resolution impulses.
    Sensor,
}

/// A shape attachment defining where overlap is tested, distinct from the
/// entity it decorates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub shape: Shape,
    pub kind: ColliderKind,
}

impl Collider {
    pub fn solid(shape: Shape) -> Self {
        Self {
            shape,
            kind: ColliderKind::Solid,
        }
    }

    pub fn sensor(shape: Shape) -> Self {
        Self {
            shape,
            kind: ColliderKind::Sensor,
        }
    }

    pub fn is_sensor(&self) -> bool {
        self.kind == ColliderKind::Sensor
    }
}

/// A positive-penetration overlap between two shapes.
///
/// `normal` is a unit vector pointing toward the first shape of the pair
/// that produced the contact (the direction that pushes it out of overlap).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub penetration: f32,
    pub normal: Vec2,
}

impl Contact {
    /// The same contact as seen from the other side of the pair.
    pub fn flipped(&self) -> Contact {
        Contact {
            penetration: self.penetration,
            normal: -self.normal,
        }
    }
}

/// Circle vs circle overlap.
///
/// Penetration is `(radius_a + radius_b) - distance(centers)`; the normal
/// points from `b` toward `a`. Concentric circles are degenerate (the
/// normal direction is undefined) and report no collision.
pub fn circle_circle(
    center_a: Vec2,
    radius_a: f32,
    center_b: Vec2,
    radius_b: f32,
) -> Option<Contact> {
    let delta = center_a - center_b;
    let distance = delta.length();
    let penetration = (radius_a + radius_b) - distance;
    if penetration <= 0.0 || distance == 0.0 {
        return None;
    }
    Some(Contact {
        penetration,
        normal: delta / distance,
    })
}

/// Circle vs axis-aligned rectangle overlap.
///
/// The circle center is clamped to the rectangle bounds to find the closest
/// point; penetration is `radius - distance(center, closest)` and the
/// normal points from the closest point toward the circle center. A circle
/// center exactly on the closest point (center inside or on the rectangle)
/// is degenerate and reports no collision.
pub fn circle_rect(
    circle_center: Vec2,
    radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
) -> Option<Contact> {
    let min = rect_center - half_extents;
    let max = rect_center + half_extents;
    let closest = circle_center.clamp(min, max);

    let delta = circle_center - closest;
    let distance = delta.length();
    let penetration = radius - distance;
    if penetration <= 0.0 || distance == 0.0 {
        return None;
    }
    Some(Contact {
        penetration,
        normal: delta / distance,
    })
}

/// Axis-aligned rectangle vs rectangle overlap.
///
/// Overlap on each axis is `(half_a + half_b) - |center_a - center_b|`;
/// both must be positive. Penetration is the smaller axis overlap and the
/// normal points from `b`'s center toward `a`'s center. Coincident centers
/// are degenerate and report no collision.
pub fn rect_rect(
    center_a: Vec2,
    half_a: Vec2,
    center_b: Vec2,
    half_b: Vec2,
) -> Option<Contact> {
    let delta = center_a - center_b;
    let overlap_x = (half_a.x + half_b.x) - delta.x.abs();
    let overlap_y = (half_a.y + half_b.y) - delta.y.abs();
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    let distance = delta.length();
    if distance == 0.0 {
        return None;
    }
    Some(Contact {
        penetration: overlap_x.min(overlap_y),
        normal: delta / distance,
    })
}

/// Dispatches to the matching shape-pair function. The returned normal
/// points toward shape `a`.
pub fn shapes_collide(pos_a: Vec2, shape_a: Shape, pos_b: Vec2, shape_b: Shape) -> Option<Contact> {
    match (shape_a, shape_b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(pos_a, ra, pos_b, rb)
        }
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            circle_rect(pos_a, radius, pos_b, half_extents)
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            circle_rect(pos_b, radius, pos_a, half_extents).map(|contact| contact.flipped())
        }
        (Shape::Rect { half_extents: ha }, Shape::Rect { half_extents: hb }) => {
            rect_rect(pos_a, ha, pos_b, hb)
        }
    }
}

/// Velocity resolution for a moving body against a contact, used by
/// character controllers outside the generic engine.
///
/// Projects the velocity onto the contact normal; when the body is moving
/// into the surface the penetration-scaled normal is added (decelerating
/// the into-surface motion), otherwise it is subtracted (nudging out of
/// overlap). This is a deliberate approximation, not a full impulse
/// solver: a body at rest touching a wall can come away with a small
/// non-zero velocity.
pub fn resolve_velocity(velocity: Vec2, contact: &Contact) -> Vec2 {
    let along_normal = velocity.dot(contact.normal);
    if along_normal < 0.0 {
        velocity + contact.normal * contact.penetration
    } else {
        velocity - contact.normal * contact.penetration
    }
}
