// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// `0, 1, .., n - 1`
pub fn numbers(n: usize) -> Vec<i32> {
    (0..n as i32).collect()
}

/// `"0", "1", .., "n - 1"`
pub fn strings(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}
