use serde::Serialize;

use crate::models::Internship;

/// One weighted point on the internship heat map
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub intensity: f64,
}

/// Host map widget capability
///
/// Tile rendering lives outside this crate; the renderer only receives the
/// aggregated points whenever the displayed records change.
#[cfg_attr(test, mockall::automock)]
pub trait MapRenderer: Send {
    fn set_heat_points(&mut self, points: &[HeatPoint]);
}

/// Heat points for the records that have usable coordinates
pub fn heat_points(records: &[Internship]) -> Vec<HeatPoint> {
    records
        .iter()
        .filter_map(Internship::coordinates)
        .map(|(lat, lng)| HeatPoint {
            lat,
            lng,
            intensity: 1.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::internship;

    #[test]
    fn test_heat_points_skip_records_without_coordinates() {
        let mut pune = internship("1");
        pune.lat = Some(18.52);
        pune.lng = Some(73.85);
        let unknown = internship("2");
        let mut zero = internship("3");
        zero.lat = Some(0.0);
        zero.lng = Some(0.0);

        let points = heat_points(&[pune, unknown, zero]);

        assert_eq!(
            points,
            vec![HeatPoint {
                lat: 18.52,
                lng: 73.85,
                intensity: 1.0
            }]
        );
    }

    #[test]
    fn test_renderer_receives_points() {
        let mut record = internship("1");
        record.lat = Some(28.61);
        record.lng = Some(77.21);

        let mut renderer = MockMapRenderer::new();
        renderer
            .expect_set_heat_points()
            .withf(|points| points.len() == 1 && points[0].lat == 28.61)
            .times(1)
            .return_const(());

        renderer.set_heat_points(&heat_points(&[record]));
    }
}
