use glam::{Mat4, Vec3};
use virtual_museum::math::{intersect_aabb, Ray, AABB};

#[cfg(test)]
mod aabb_tests {
    use super::*;

    #[test]
    fn test_aabb_union_creates_bounding_box() {
        let door_panel = AABB {
            min: Vec3::new(-0.5, 0.0, -5.1),
            max: Vec3::new(0.5, 2.0, -4.9),
        };
        let handle = AABB {
            min: Vec3::new(0.3, 0.9, -4.9),
            max: Vec3::new(0.4, 1.0, -4.8),
        };

        let union = door_panel.union(&handle);

        assert_eq!(union.min, Vec3::new(-0.5, 0.0, -5.1));
        assert_eq!(union.max, Vec3::new(0.5, 2.0, -4.8));
    }

    #[test]
    fn test_aabb_union_with_contained_box() {
        let room = AABB {
            min: Vec3::new(0.0, 0.0, 0.0),
            max: Vec3::new(10.0, 10.0, 10.0),
        };
        let frame = AABB {
            min: Vec3::new(2.0, 2.0, 2.0),
            max: Vec3::new(8.0, 8.0, 8.0),
        };

        let union = room.union(&frame);

        assert_eq!(union.min, room.min, "Union should equal larger box");
        assert_eq!(union.max, room.max, "Union should equal larger box");
    }

    #[test]
    fn test_aabb_center_with_negative_coords() {
        let aabb = AABB {
            min: Vec3::new(-10.0, -20.0, -30.0),
            max: Vec3::new(10.0, 20.0, 30.0),
        };

        assert_eq!(aabb.center(), Vec3::ZERO);
    }

    #[test]
    fn test_distance_to_point_outside_and_inside() {
        let door = AABB::new(Vec3::new(-0.5, 0.0, -5.1), Vec3::new(0.5, 2.0, -4.9));

        let in_front = door.distance_to_point(Vec3::new(0.0, 1.0, -2.0));
        assert!((in_front - 2.9).abs() < 1e-5, "got {}", in_front);

        let diagonal = door.distance_to_point(Vec3::new(3.5, 1.0, -0.9));
        assert!((diagonal - 5.0).abs() < 1e-5, "got {}", diagonal);

        assert_eq!(door.distance_to_point(Vec3::new(0.0, 1.0, -5.0)), 0.0);
    }

    #[test]
    fn test_intersects_is_symmetric_and_touching_counts() {
        let a = AABB::new(Vec3::ZERO, Vec3::ONE);
        let b = AABB::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let c = AABB::new(Vec3::new(1.5, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!c.intersects(&a));
    }

    #[test]
    fn test_contains_point_on_boundary() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::splat(2.0));
        assert!(aabb.contains_point(Vec3::new(2.0, 1.0, 0.0)));
        assert!(!aabb.contains_point(Vec3::new(2.01, 1.0, 0.0)));
    }

    #[test]
    fn test_transformed_box_encloses_rotated_corners() {
        let aabb = AABB::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 1.0, 2.0));
        let quarter_turn = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);

        let rotated = aabb.transformed(&quarter_turn);

        assert!(rotated.min.abs_diff_eq(Vec3::new(-2.0, 0.0, -1.0), 1e-5));
        assert!(rotated.max.abs_diff_eq(Vec3::new(2.0, 1.0, 1.0), 1e-5));
    }

    #[test]
    fn test_transformed_box_follows_translation() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::ONE);
        let moved = aabb.transformed(&Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)));
        assert_eq!(moved.min, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(moved.max, Vec3::new(1.0, 1.0, -4.0));
    }
}

#[cfg(test)]
mod ray_intersection_tests {
    use super::*;

    #[test]
    fn test_ray_hits_aabb_from_outside() {
        let ray_origin = Vec3::new(0.0, 0.0, 0.0);
        let ray_dir = Vec3::new(1.0, 0.0, 0.0).normalize();
        let box_min = Vec3::new(5.0, -1.0, -1.0);
        let box_max = Vec3::new(10.0, 1.0, 1.0);

        let t = intersect_aabb(ray_origin, ray_dir, box_min, box_max);

        assert!(t > 0.0, "Ray should hit AABB");
        assert!((t - 5.0).abs() < 0.001, "Hit distance should be ~5.0, got {}", t);
    }

    #[test]
    fn test_ray_misses_aabb() {
        let t = intersect_aabb(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(5.0, 5.0, 5.0),
            Vec3::new(10.0, 10.0, 10.0),
        );

        assert_eq!(t, -1.0, "Ray should miss AABB");
    }

    #[test]
    fn test_ray_starts_inside_aabb() {
        let t = intersect_aabb(
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::X,
            Vec3::new(0.0, -1.0, -1.0),
            Vec3::new(10.0, 1.0, 1.0),
        );

        assert!((t - 5.0).abs() < 0.001, "Should return exit distance when ray starts inside, got {}", t);
    }

    #[test]
    fn test_axis_parallel_ray_outside_slab_misses() {
        // Zero x component: the x slab alone decides the miss
        let t = intersect_aabb(
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::Z,
            Vec3::new(-1.0, -1.0, 5.0),
            Vec3::new(1.0, 1.0, 6.0),
        );
        assert_eq!(t, -1.0);
    }

    #[test]
    fn test_ray_hits_aabb_at_angle() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        let aabb = AABB::new(Vec3::splat(5.0), Vec3::splat(10.0));

        let t = ray.intersect(&aabb).expect("Ray should hit AABB at angle");
        let hit = ray.point_at(t);

        assert!(
            hit.abs_diff_eq(Vec3::splat(5.0), 1e-3),
            "Diagonal ray should enter at the near corner, got {:?}",
            hit
        );
    }

    #[test]
    fn test_ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -8.0));
        assert_eq!(ray.direction, Vec3::NEG_Z);
    }

    #[test]
    fn test_screen_ray_corners_diverge() {
        let view = Mat4::look_to_rh(Vec3::new(0.0, 1.6, 0.0), Vec3::Z, Vec3::Y);
        let projection = Mat4::perspective_rh(70f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0);

        let top_left = Ray::from_screen(0.0, 0.0, 1280.0, 720.0, view, projection);
        let bottom_right = Ray::from_screen(1280.0, 720.0, 1280.0, 720.0, view, projection);

        assert!(top_left.direction.y > 0.0, "Top of the screen looks up");
        assert!(bottom_right.direction.y < 0.0, "Bottom of the screen looks down");
        // Looking down +Z in a right-handed frame, screen right is -X
        assert!(top_left.direction.x > 0.0);
        assert!(bottom_right.direction.x < 0.0);
        assert!((top_left.origin.y - 1.6).abs() < 0.2);
    }
}
