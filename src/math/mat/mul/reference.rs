use super::Rows;

/// Scalar triple loop, accumulating from zero in column order
pub(super) fn matmul(lhs: &Rows, rhs: &Rows) -> Rows {
    let mut result = [[0.; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += lhs[i][k] * rhs[k][j];
            }
        }
    }
    result
}

#[cfg(test)]
mod test {
    use super::matmul;

    #[test]
    fn known_product() {
        let a = [
            [1., 2., 3.],
            [4., 5., 6.],
            [7., 8., 9.],
        ];
        let b = [
            [9., 8., 7.],
            [6., 5., 4.],
            [3., 2., 1.],
        ];
        assert_eq!(matmul(&a, &b), [
            [30., 24., 18.],
            [84., 69., 54.],
            [138., 114., 90.],
        ]);
    }
}
