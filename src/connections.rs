// --- File: connections.rs ---
use crate::body::Body;
use crate::config::ParticleConfig;
use crate::grid::SpatialGrid;
use crate::surface::DrawSurface;
use crate::utils::with_alpha;
use glam::{Vec2, Vec4};
use rayon::prelude::*;

/// Segment between two bodies within the link radius.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub from: Vec2,
    pub to: Vec2,
    pub opacity: f32,
}

/// Linear falloff: 1 at distance 0, 0 at the link radius.
#[inline]
pub fn link_opacity(distance: f32, link_radius: f32) -> f32 {
    (1.0 - distance / link_radius).clamp(0.0, 1.0)
}

/// Links between every pair closer than `link_radius`. Each body scans its
/// 3x3 neighborhood and keeps only partners with a larger id, so every pair
/// is produced once. Cells are never smaller than `link_radius`, or the 3x3
/// scan would miss partners.
pub fn collect_links(bodies: &[Body], link_radius: f32, cell_size: f32) -> Vec<Link> {
    if bodies.len() < 2 {
        return Vec::new();
    }
    let link_radius_sq = link_radius * link_radius;
    let grid = SpatialGrid::build(bodies, cell_size.max(link_radius));

    bodies
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, body)| {
            let grid = &grid;
            grid.neighborhood(grid.key_for(body.position))
                .filter(move |entry| entry.id > body.id)
                .filter_map(move |entry| {
                    let other = &bodies[entry.index];
                    make_link(i, body, entry.index, other, link_radius, link_radius_sq)
                })
        })
        .collect()
}

/// Exhaustive O(n²) variant of [`collect_links`]; produces the same set of links.
pub fn collect_links_exhaustive(bodies: &[Body], link_radius: f32) -> Vec<Link> {
    let link_radius_sq = link_radius * link_radius;
    let mut links = Vec::new();
    for (i, a) in bodies.iter().enumerate() {
        for (j, b) in bodies.iter().enumerate().skip(i + 1) {
            let (lo, lo_body, hi, hi_body) = if a.id < b.id {
                (i, a, j, b)
            } else {
                (j, b, i, a)
            };
            if let Some(link) = make_link(lo, lo_body, hi, hi_body, link_radius, link_radius_sq) {
                links.push(link);
            }
        }
    }
    links
}

fn make_link(
    i: usize,
    a: &Body,
    j: usize,
    b: &Body,
    link_radius: f32,
    link_radius_sq: f32,
) -> Option<Link> {
    let dist_sq = a.position.distance_squared(b.position);
    if dist_sq >= link_radius_sq {
        return None;
    }
    Some(Link {
        a: i,
        b: j,
        from: a.position,
        to: b.position,
        opacity: link_opacity(dist_sq.sqrt(), link_radius),
    })
}

/// Draws every link as a translucent line. Returns the number of segments drawn.
pub fn render_connections<S: DrawSurface + ?Sized>(
    surface: &mut S,
    bodies: &[Body],
    config: &ParticleConfig,
) -> usize {
    let links = collect_links(bodies, config.link_radius, config.connection_cell_size);
    let line_color = Vec4::from(config.line_color);
    for link in &links {
        surface.stroke_line(
            link.from,
            link.to,
            config.line_width,
            with_alpha(line_color, link.opacity),
        );
    }
    links.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyId;
    use crate::surface::DrawList;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn body_at(id: u32, x: f32, y: f32) -> Body {
        Body::new(BodyId(id), Vec2::new(x, y), Vec2::ZERO, 2.0)
    }

    fn pair_set(links: &[Link]) -> HashSet<(usize, usize)> {
        links.iter().map(|l| (l.a.min(l.b), l.a.max(l.b))).collect()
    }

    #[test]
    fn opacity_falls_off_linearly() {
        assert_eq!(link_opacity(0.0, 250.0), 1.0);
        assert!((link_opacity(125.0, 250.0) - 0.5).abs() < 1e-6);
        assert_eq!(link_opacity(250.0, 250.0), 0.0);
    }

    #[test]
    fn grid_and_exhaustive_scans_agree() {
        let mut rng = StdRng::seed_from_u64(5);
        let bodies: Vec<Body> = (0..180)
            .map(|id| body_at(id, rng.gen_range(0.0..1600.0), rng.gen_range(0.0..900.0)))
            .collect();

        let by_grid = collect_links(&bodies, 250.0, 250.0);
        let by_scan = collect_links_exhaustive(&bodies, 250.0);

        assert_eq!(by_grid.len(), by_scan.len());
        assert_eq!(pair_set(&by_grid), pair_set(&by_scan));
    }

    #[test]
    fn fine_grid_still_finds_distant_partners() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut bodies: Vec<Body> = (0..120)
            .map(|id| body_at(id, rng.gen_range(0.0..1200.0), rng.gen_range(0.0..800.0)))
            .collect();
        bodies.push(body_at(500, 2000.0, 2000.0));
        bodies.push(body_at(501, 2200.0, 2000.0));

        let by_grid = collect_links(&bodies, 250.0, 50.0);
        let by_scan = collect_links_exhaustive(&bodies, 250.0);

        assert_eq!(pair_set(&by_grid), pair_set(&by_scan));
        assert!(pair_set(&by_grid).contains(&(120, 121)));
    }

    #[test]
    fn links_at_or_beyond_radius_are_skipped() {
        let bodies = vec![
            body_at(0, 0.0, 0.0),
            body_at(1, 250.0, 0.0),
            body_at(2, 100.0, 0.0),
        ];
        let links = collect_links(&bodies, 250.0, 250.0);
        assert_eq!(pair_set(&links), HashSet::from([(0, 2), (1, 2)]));
    }

    #[test]
    fn render_draws_translucent_lines() {
        let config = ParticleConfig::default();
        let bodies = vec![body_at(0, 10.0, 10.0), body_at(1, 135.0, 10.0)];
        let mut list = DrawList::new(300, 300);

        assert_eq!(render_connections(&mut list, &bodies, &config), 1);
        let lines: Vec<_> = list.lines().collect();
        assert_eq!(lines.len(), 1);
        let (from, to, color) = lines[0];
        assert_eq!((from, to), (Vec2::new(10.0, 10.0), Vec2::new(135.0, 10.0)));
        assert!((color.w - 0.5).abs() < 1e-6);
    }
}
// --- End of File: connections.rs ---
