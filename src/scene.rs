// Render-to-texture attitude preview: a small quadcopter model tilted to
// match the latest orientation telemetry, shown inside the egui layout.

use bevy::prelude::*;
use bevy::render::camera::RenderTarget;
use bevy::render::render_resource::{
    Extent3d, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages,
};

/// Marker component for the airframe entity
#[derive(Component)]
pub struct Airframe;

/// Current device orientation in degrees, as reported by telemetry
#[derive(Component, Default)]
pub struct AirframeAttitude {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

/// Resource holding the preview render target handle
#[derive(Resource)]
pub struct PreviewImage {
    pub handle: Handle<Image>,
}

pub fn setup_preview_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    // 2D camera for the window surface; the egui panels draw on top of it
    commands.spawn(Camera2d);

    // Kept small, the preview is a thumbnail
    let size = Extent3d {
        width: 320,
        height: 240,
        depth_or_array_layers: 1,
    };

    let mut image = Image {
        texture_descriptor: TextureDescriptor {
            label: None,
            size,
            dimension: TextureDimension::D2,
            format: TextureFormat::Bgra8UnormSrgb,
            mip_level_count: 1,
            sample_count: 1,
            usage: TextureUsages::TEXTURE_BINDING
                | TextureUsages::COPY_DST
                | TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        },
        ..default()
    };
    image.resize(size);

    let image_handle = images.add(image);
    commands.insert_resource(PreviewImage {
        handle: image_handle.clone(),
    });

    let body_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.55, 0.6),
        ..default()
    });
    let arm_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.35, 0.4),
        ..default()
    });
    let nose_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.1, 0.8, 0.1),
        ..default()
    });

    let airframe = commands
        .spawn((
            Name::new("Airframe"),
            Airframe,
            AirframeAttitude::default(),
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    // Central body with a nose marker so the facing direction reads at a
    // glance
    let body = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(0.35, 0.12, 0.35))),
            MeshMaterial3d(body_material),
            Transform::default(),
        ))
        .id();
    commands.entity(airframe).add_child(body);

    let nose = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(0.1, 0.06, 0.04))),
            MeshMaterial3d(nose_material),
            Transform::from_xyz(0.0, 0.04, 0.22),
        ))
        .id();
    commands.entity(airframe).add_child(nose);

    // Four diagonal arms, a motor pod at the end of each
    let arm_length = 0.45;
    for i in 0..4 {
        let angle = (i as f32) * std::f32::consts::FRAC_PI_2 + std::f32::consts::FRAC_PI_4;
        let dir = Vec3::new(angle.cos(), 0.0, angle.sin());

        let arm = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::new(arm_length, 0.04, 0.06))),
                MeshMaterial3d(arm_material.clone()),
                Transform::from_translation(dir * arm_length / 2.0)
                    .with_rotation(Quat::from_rotation_y(-angle)),
            ))
            .id();
        commands.entity(airframe).add_child(arm);

        let motor = commands
            .spawn((
                Mesh3d(meshes.add(Cylinder::new(0.07, 0.06))),
                MeshMaterial3d(arm_material.clone()),
                Transform::from_translation(dir * arm_length + Vec3::Y * 0.05),
            ))
            .id();
        commands.entity(airframe).add_child(motor);
    }

    // Ground reference disc
    commands.spawn((
        Mesh3d(meshes.add(Cylinder::new(1.2, 0.01))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.3, 0.3, 0.35, 0.4),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.4, 0.0),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 9_000.0,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_4,
            -std::f32::consts::FRAC_PI_4,
            0.0,
        )),
    ));

    // Preview camera renders into the texture egui displays
    commands.spawn((
        Camera3d::default(),
        Camera {
            target: RenderTarget::Image(image_handle),
            ..default()
        },
        Transform::from_xyz(0.0, 1.2, 2.4).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Tilts the airframe to the latest reported orientation
pub fn apply_attitude(mut query: Query<(&mut Transform, &AirframeAttitude), With<Airframe>>) {
    for (mut transform, attitude) in query.iter_mut() {
        transform.rotation = Quat::from_euler(
            EulerRot::YXZ,
            attitude.yaw.to_radians(),
            attitude.pitch.to_radians(),
            attitude.roll.to_radians(),
        );
    }
}
