// Gravimetric potential per unit depth
pub const PSI_Z_FACTOR: f64 = 0.98;

// Gravimetric potential psiZ for a given depth
pub fn get_psi_z(depth: f64) -> f64 {
    depth * PSI_Z_FACTOR
}

// Hydraulic potential psiH = psiM + psiZ
pub fn get_psi_h(psi_m: f64, z: f64) -> f64 {
    psi_m + get_psi_z(z)
}

/**
Unsaturated hydraulic conductivity after van Genuchten-Mualem.

# Arguments
* `alpha` - van Genuchten parameter [1/cm].
* `ks` - Saturated hydraulic conductivity.
* `n` - van Genuchten shape parameter [-], > 1.
* `l` - Pore connectivity parameter [-].
* `psi_m` - Matric potential [cm]; only its magnitude is used.

# Returns
kf in the unit of `ks`. At `psi_m = 0` this is `ks`.
*/
pub fn calc_kf(alpha: f64, ks: f64, n: f64, l: f64, psi_m: f64) -> f64 {
    let m = 1.0 - 1.0 / n;
    let ah = alpha * psi_m.abs();
    let upper_term = (1.0 - ah.powf(n - 1.0) * (1.0 + ah.powf(n)).powf(-m)).powi(2);
    let lower_term = (1.0 + ah.powf(n)).powf(m * l);
    ks * upper_term / lower_term
}
