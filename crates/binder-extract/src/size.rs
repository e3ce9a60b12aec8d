const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Human-readable size with one decimal, e.g. `1.5KB`. Zero is `0B`.
pub fn format_file_size(bytes: u64) -> String {
  if bytes == 0 {
    return "0B".to_owned();
  }
  let mut size = bytes as f64;
  let mut unit = 0;
  while size >= 1024.0 && unit < UNITS.len() - 1 {
    size /= 1024.0;
    unit += 1;
  }
  format!("{size:.1}{}", UNITS[unit])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn formats_each_unit() {
    assert_eq!(format_file_size(0), "0B");
    assert_eq!(format_file_size(512), "512.0B");
    assert_eq!(format_file_size(1536), "1.5KB");
    assert_eq!(format_file_size(2 * 1024 * 1024), "2.0MB");
    assert_eq!(format_file_size(1024 * 1024 * 1024), "1.0GB");
  }

  #[test]
  fn gigabytes_is_the_largest_unit() {
    assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048.0GB");
  }
}
