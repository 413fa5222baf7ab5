//! Stride simulation demo
//!
//! Loads a motion configuration (path as the first argument, embedded
//! default otherwise), builds a small room and runs a scripted sequence of
//! movements, logging every outcome.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use nalgebra::Vector3;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stride_core::traits::JointKind;
use stride_drivers::collision::{Obstacle, Shape, StaticScene};
use stride_sim::config::load;
use stride_sim::{LogListener, Session, SimError, SimWorld};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let path = env::args().nth(1).map(PathBuf::from);
    let config = match load(path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let world = SimWorld::new(&config).with_scene(room());
    let mut session = match Session::new(config, world, LogListener) {
        Ok(session) => session,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run_script(&mut session) {
        Ok(()) => {
            info!(
                clock = session.world().clock(),
                frames = session.frames(),
                "script complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// A 6 m room with a sofa against the far wall
fn room() -> StaticScene {
    let walls = [
        ("Wall_North", Vector3::new(0.0, 3.0, 1.0), Vector3::new(3.0, 0.05, 1.0)),
        ("Wall_South", Vector3::new(0.0, -3.0, 1.0), Vector3::new(3.0, 0.05, 1.0)),
        ("Wall_East", Vector3::new(3.0, 0.0, 1.0), Vector3::new(0.05, 3.0, 1.0)),
        ("Wall_West", Vector3::new(-3.0, 0.0, 1.0), Vector3::new(0.05, 3.0, 1.0)),
    ];

    let mut scene = StaticScene::new();
    for (name, center, half_extents) in walls {
        place(
            &mut scene,
            Obstacle::fixed(
                name,
                Shape::Box {
                    center,
                    half_extents,
                },
                false,
            ),
        );
    }
    place(
        &mut scene,
        Obstacle::fixed(
            "Sofa",
            Shape::Box {
                center: Vector3::new(2.4, 0.0, 0.4),
                half_extents: Vector3::new(0.4, 1.0, 0.4),
            },
            true,
        ),
    );
    scene
}

/// Add an obstacle, warning if the scene is full
///
/// Returns true if the obstacle was placed.
fn place(scene: &mut StaticScene, obstacle: Obstacle) -> bool {
    match scene.add(obstacle) {
        Ok(()) => true,
        Err(rejected) => {
            warn!(name = rejected.name.as_str(), "scene full, obstacle dropped");
            false
        }
    }
}

fn run_script(session: &mut Session<LogListener>) -> Result<(), SimError> {
    session.walk(1.0)?;
    session.turn(90.0)?;
    session.walk(1.5)?;
    session.turn(-90.0)?;

    // Runs into the east wall and rolls back
    session.walk(3.0)?;

    session.reach_to(Vector3::new(0.3, 0.3, 1.2))?;
    session.rotate_wrist_by(45.0)?;
    session.move_object_to(Vector3::new(1.0, 1.0, 0.5))?;
    session.rotate_object_to(30.0)?;
    session.teleport_object(Vector3::new(-1.0, 0.0, 0.5))?;

    session.move_joint(JointKind::Lift, 0.5)?;
    session.move_joint(JointKind::Rotate, -30.0)?;
    for (kind, reason) in session.settle_joints()? {
        info!(joint = kind.label(), reason = reason.label(), "joint settled");
    }
    Ok(())
}
