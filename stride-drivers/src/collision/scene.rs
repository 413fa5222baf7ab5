//! Static obstacle scene
//!
//! Named spheres and boxes tested against a moving body's bounding sphere
//! once per host tick. Every overlap is reported to the monitor, which
//! latches the first static one.

use heapless::{String, Vec};
use libm::fabsf;
use nalgebra::Vector3;

use stride_core::collision::ObstructionMonitor;
use stride_core::traits::MAX_NAME_LEN;

/// Maximum obstacles per scene
pub const MAX_OBSTACLES: usize = 16;

/// Obstacle geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Sphere around a centre point
    Sphere { center: Vector3<f32>, radius: f32 },
    /// Axis-aligned box
    Box {
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
    },
}

impl Shape {
    /// Get the distance from a point to the shape's surface (0 when inside)
    pub fn distance_to(&self, point: &Vector3<f32>) -> f32 {
        match self {
            Shape::Sphere { center, radius } => ((point - center).norm() - radius).max(0.0),
            Shape::Box {
                center,
                half_extents,
            } => {
                let d = point - center;
                let outside = Vector3::new(
                    (fabsf(d.x) - half_extents.x).max(0.0),
                    (fabsf(d.y) - half_extents.y).max(0.0),
                    (fabsf(d.z) - half_extents.z).max(0.0),
                );
                outside.norm()
            }
        }
    }
}

/// A named scene entity
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub name: String<MAX_NAME_LEN>,
    pub shape: Shape,
    /// Whether the obstacle never moves
    pub is_static: bool,
    /// Whether the obstacle is a registered object rather than scene structure
    pub is_known_entity: bool,
}

impl Obstacle {
    /// Create a static obstacle
    ///
    /// Names longer than [`MAX_NAME_LEN`] bytes are truncated.
    pub fn fixed(name: &str, shape: Shape, is_known_entity: bool) -> Self {
        Self {
            name: truncate(name),
            shape,
            is_static: true,
            is_known_entity,
        }
    }

    /// Create an obstacle that moves (a person, a pet)
    pub fn moving(name: &str, shape: Shape) -> Self {
        Self {
            name: truncate(name),
            shape,
            is_static: false,
            is_known_entity: true,
        }
    }
}

fn truncate(name: &str) -> String<MAX_NAME_LEN> {
    let mut out = String::new();
    for c in name.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Fixed set of obstacles
#[derive(Debug, Clone, Default)]
pub struct StaticScene {
    obstacles: Vec<Obstacle, MAX_OBSTACLES>,
}

impl StaticScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an obstacle
    ///
    /// Hands the obstacle back if the scene is full.
    pub fn add(&mut self, obstacle: Obstacle) -> Result<(), Obstacle> {
        self.obstacles.push(obstacle)
    }

    /// Get all obstacles
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Report every obstacle overlapping a sphere to the monitor
    ///
    /// Returns the number of contacts reported.
    pub fn check(&self, center: &Vector3<f32>, radius: f32, monitor: &mut ObstructionMonitor) -> usize {
        let mut contacts = 0;
        for obstacle in &self.obstacles {
            if obstacle.shape.distance_to(center) <= radius {
                monitor.record_contact(&obstacle.name, obstacle.is_static, obstacle.is_known_entity);
                contacts += 1;
            }
        }
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_core::traits::CollisionSignal;

    fn sofa() -> Obstacle {
        Obstacle::fixed(
            "Sofa",
            Shape::Box {
                center: Vector3::new(2.0, 0.0, 0.0),
                half_extents: Vector3::new(0.5, 1.0, 0.5),
            },
            true,
        )
    }

    #[test]
    fn test_box_distance() {
        let shape = sofa().shape;
        assert_eq!(shape.distance_to(&Vector3::new(2.0, 0.5, 0.0)), 0.0);
        assert!((shape.distance_to(&Vector3::new(0.5, 0.0, 0.0)) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_distance() {
        let shape = Shape::Sphere {
            center: Vector3::zeros(),
            radius: 1.0,
        };
        assert!((shape.distance_to(&Vector3::new(3.0, 0.0, 0.0)) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_contact_latches_first_static() {
        let mut scene = StaticScene::new();
        scene.add(sofa()).unwrap();
        scene
            .add(Obstacle::fixed(
                "Wall_3",
                Shape::Box {
                    center: Vector3::new(2.0, 0.0, 0.0),
                    half_extents: Vector3::new(0.1, 5.0, 2.0),
                },
                false,
            ))
            .unwrap();

        let mut monitor = ObstructionMonitor::new();
        assert_eq!(scene.check(&Vector3::new(0.0, 0.0, 0.0), 0.3, &mut monitor), 0);
        assert!(!monitor.should_halt());

        assert_eq!(scene.check(&Vector3::new(1.3, 0.0, 0.0), 0.3, &mut monitor), 1);
        assert_eq!(scene.check(&Vector3::new(1.8, 0.0, 0.0), 0.3, &mut monitor), 2);
        let obstruction = monitor.first_static_obstruction().unwrap();
        assert_eq!(obstruction.name.as_str(), "Sofa");
        assert!(obstruction.is_known_entity);
    }

    #[test]
    fn test_moving_obstacle_does_not_halt() {
        let mut scene = StaticScene::new();
        scene
            .add(Obstacle::moving(
                "Cat",
                Shape::Sphere {
                    center: Vector3::zeros(),
                    radius: 0.2,
                },
            ))
            .unwrap();

        let mut monitor = ObstructionMonitor::new();
        assert_eq!(scene.check(&Vector3::zeros(), 0.1, &mut monitor), 1);
        assert!(!monitor.should_halt());
        assert_eq!(monitor.contact_count(), 1);
    }

    #[test]
    fn test_long_names_truncated() {
        let obstacle = Obstacle::fixed(
            "a_really_long_structure_name_from_the_scene",
            Shape::Sphere {
                center: Vector3::zeros(),
                radius: 1.0,
            },
            false,
        );
        assert_eq!(obstacle.name.len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_scene_full() {
        let mut scene = StaticScene::new();
        for _ in 0..MAX_OBSTACLES {
            scene.add(sofa()).unwrap();
        }
        assert!(scene.add(sofa()).is_err());
    }
}
