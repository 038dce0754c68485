use ndarray::Array1;

/// L2-normalize, zero vectors are returned unchanged.
pub fn normalize(array: Array1<f32>) -> Array1<f32> {
    let norm = array.dot(&array).sqrt();
    if norm == 0.0 {
        array
    } else {
        array / norm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_unit_length() {
        let v = normalize(ndarray::arr1(&[3.0, 4.0]));
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_vector() {
        let v = normalize(ndarray::arr1(&[0.0, 0.0, 0.0]));
        assert_eq!(v.to_vec(), vec![0.0, 0.0, 0.0]);
    }
}
