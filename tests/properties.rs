use glam::Vec2;
use proptest::prelude::*;
use sweep2d::consts::SIM_DT;
use sweep2d::{
    Entity, ScratchArena, Settings, Shape, Transform, World, gjk_intersect, gjk_intersect_point,
    gjk_intersect_with_info, physics_step,
};

/// Axis-aligned box on integer coordinates: (min, size)
fn int_rect() -> impl Strategy<Value = (Vec2, Vec2)> {
    (-20i32..=20, -20i32..=20, 1i32..=10, 1i32..=10).prop_map(|(x, y, w, h)| {
        (
            Vec2::new(x as f32, y as f32),
            Vec2::new(w as f32, h as f32),
        )
    })
}

/// Two integer boxes overlapping with positive area on both axes
fn overlapping_pair() -> impl Strategy<Value = ((Vec2, Vec2), (Vec2, Vec2))> {
    (int_rect(), 1i32..=10, 1i32..=10)
        .prop_flat_map(|(a, w, h)| {
            let (aw, ah) = (a.1.x as i32, a.1.y as i32);
            (Just(a), Just(Vec2::new(w as f32, h as f32)), (1 - w)..aw, (1 - h)..ah)
        })
        .prop_map(|(a, size, ox, oy)| (a, (a.0 + Vec2::new(ox as f32, oy as f32), size)))
}

fn shape((min, size): (Vec2, Vec2)) -> Shape {
    Shape::rectangle(min, min + size)
}

/// Distances A must move along +x, -x, +y, -y to clear B. All positive iff
/// the boxes overlap with positive area.
fn push_outs(a: (Vec2, Vec2), b: (Vec2, Vec2)) -> [f32; 4] {
    let (a_min, a_max) = (a.0, a.0 + a.1);
    let (b_min, b_max) = (b.0, b.0 + b.1);
    [
        b_max.x - a_min.x,
        a_max.x - b_min.x,
        b_max.y - a_min.y,
        a_max.y - b_min.y,
    ]
}

proptest! {
    #[test]
    fn separated_boxes_never_intersect(a in int_rect(), b in int_rect()) {
        let outs = push_outs(a, b);
        prop_assume!(outs.iter().any(|&d| d < 0.0));

        let t = Transform::identity();
        let (sa, sb) = (shape(a), shape(b));
        prop_assert!(!gjk_intersect(&t, &sa, &t, &sb));
        prop_assert!(!gjk_intersect(&t, &sb, &t, &sa));
    }

    #[test]
    fn intersection_is_symmetric(a in int_rect(), b in int_rect()) {
        // Exactly touching boxes sit on the boundary; leave them out
        prop_assume!(push_outs(a, b).iter().all(|&d| d != 0.0));

        let t = Transform::identity();
        let (sa, sb) = (shape(a), shape(b));
        let expected = push_outs(a, b).iter().all(|&d| d > 0.0);
        prop_assert_eq!(gjk_intersect(&t, &sa, &t, &sb), expected);
        prop_assert_eq!(gjk_intersect(&t, &sb, &t, &sa), expected);
    }

    #[test]
    fn penetration_depth_is_minimum_push_out((a, b) in overlapping_pair()) {
        let mut outs = push_outs(a, b);
        outs.sort_by(f32::total_cmp);
        // A unique shortest way out keeps the normal well defined
        prop_assume!(outs[1] - outs[0] >= 1.0);

        let t = Transform::identity();
        let (sa, sb) = (shape(a), shape(b));
        let mut scratch = ScratchArena::new();
        let ab = gjk_intersect_with_info(&t, &sa, &t, &sb, &mut scratch).unwrap();
        let ba = gjk_intersect_with_info(&t, &sb, &t, &sa, &mut scratch).unwrap();

        prop_assert!((ab.depth - outs[0]).abs() < 1e-3, "depth {} vs {}", ab.depth, outs[0]);
        prop_assert!((ab.depth - ba.depth).abs() < 1e-3);
        prop_assert!((ab.normal + ba.normal).length() < 1e-4);
        prop_assert_eq!(scratch.in_use(), 0);
    }

    #[test]
    fn moving_by_mtv_leaves_boxes_touching((a, b) in overlapping_pair()) {
        let mut outs = push_outs(a, b);
        outs.sort_by(f32::total_cmp);
        prop_assume!(outs[1] - outs[0] >= 1.0);

        let t = Transform::identity();
        let (sa, sb) = (shape(a), shape(b));
        let mut scratch = ScratchArena::new();
        let info = gjk_intersect_with_info(&t, &sa, &t, &sb, &mut scratch).unwrap();

        let moved = Transform::at(info.separation());
        if let Some(after) = gjk_intersect_with_info(&moved, &sa, &t, &sb, &mut scratch) {
            prop_assert!(after.depth < 1e-3, "residual depth {}", after.depth);
        }
    }

    #[test]
    fn point_containment_matches_box(r in int_rect(), fx in -0.5f32..1.5, fy in -0.5f32..1.5) {
        let (min, size) = r;
        let point = min + size * Vec2::new(fx, fy);
        let inside = fx > 0.01 && fx < 0.99 && fy > 0.01 && fy < 0.99;
        let outside = fx < -0.01 || fx > 1.01 || fy < -0.01 || fy > 1.01;
        prop_assume!(inside || outside);

        let hit = gjk_intersect_point(&Transform::identity(), &shape(r), point);
        prop_assert_eq!(hit, inside);
    }

    #[test]
    fn dropped_body_comes_to_rest_on_floor(
        x in -20.0f32..20.0,
        height in 0.6f32..10.0,
        vx in -10.0f32..10.0,
    ) {
        let settings = Settings::default();
        let mut world = World::new();
        let floor = world.spawn(Entity::obstacle(
            Shape::rectangle(Vec2::new(-100.0, -1.0), Vec2::new(100.0, 0.0)),
            Vec2::ZERO,
        ));
        let body = world.spawn(
            Entity::body(Shape::rect_centered(Vec2::ONE), Vec2::new(x, height))
                .with_velocity(Vec2::new(vx, 0.0)),
        );

        let mut scratch = ScratchArena::new();
        for _ in 0..120 {
            physics_step(&mut world, &mut scratch, &settings, SIM_DT);
        }

        let (e, f) = (world.get(body).unwrap(), world.get(floor).unwrap());
        prop_assert!(e.on_ground);
        prop_assert_eq!(e.support, Some(floor));
        prop_assert!((e.position.y - 0.5).abs() < 0.01, "y = {}", e.position.y);
        let residual = gjk_intersect_with_info(&e.transform(), &e.shape, &f.transform(), &f.shape, &mut scratch)
            .map_or(0.0, |info| info.depth);
        prop_assert!(residual < 0.01);
    }
}
