use crate::geometry::network::Coord;

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const WGS84_B: f64 = (1.0 - WGS84_F) * WGS84_A;

/// IUGG mean earth radius, used when the ellipsoidal solution does not converge.
const MEAN_RADIUS_M: f64 = 6_371_008.8;

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

/// Surface distance in kilometers between two `[lon, lat]` points on the WGS-84 ellipsoid.
///
/// Uses Vincenty's inverse formula. Nearly antipodal pairs, where the iteration can fail to
/// converge, fall back to [`great_circle_km`].
pub fn geodesic_km(p1: Coord, p2: Coord) -> f64 {
    vincenty_m(p1, p2).unwrap_or_else(|| great_circle_m(p1, p2)) / 1000.0
}

/// Spherical (haversine) distance in kilometers.
pub fn great_circle_km(p1: Coord, p2: Coord) -> f64 {
    great_circle_m(p1, p2) / 1000.0
}

fn great_circle_m(p1: Coord, p2: Coord) -> f64 {
    let (lat1, lat2) = (p1.lat.to_radians(), p2.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (p2.lon - p1.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * MEAN_RADIUS_M * h.sqrt().min(1.0).asin()
}

fn vincenty_m(p1: Coord, p2: Coord) -> Option<f64> {
    let l = (p2.lon - p1.lon).to_radians();
    let u1 = ((1.0 - WGS84_F) * p1.lat.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * p2.lat.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut iter = 0;
    let (sin_sigma, cos_sigma, sigma, cos_sq_alpha, cos_2sigma_m) = loop {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // Coincident points.
            return Some(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            // Equatorial line.
            0.0
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        iter += 1;
        if (lambda - prev).abs() < CONVERGENCE {
            break (sin_sigma, cos_sigma, sigma, cos_sq_alpha, cos_2sigma_m);
        }
        if iter >= MAX_ITERATIONS || !lambda.is_finite() {
            return None;
        }
    };

    let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
    let a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = b
        * sin_sigma
        * (cos_2sigma_m
            + b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                    - b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma.powi(2))
                        * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));

    let s = WGS84_B * a * (sigma - delta_sigma);
    s.is_finite().then_some(s)
}
