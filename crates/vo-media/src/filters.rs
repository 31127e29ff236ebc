//! Generic FFmpeg filter-string builders shared by the mux/mix commands.

/// Crop filter for the left half of a video.
pub fn filter_crop_left_half() -> &'static str {
    "crop=iw/2:ih:0:0"
}

/// Crop filter for the right half of a video.
pub fn filter_crop_right_half() -> &'static str {
    "crop=iw/2:ih:iw/2:0"
}

/// Filter graph stacking two videos vertically, each letterboxed to its
/// target size first.
pub fn filter_vstack(top_width: u32, top_height: u32, bottom_width: u32, bottom_height: u32) -> String {
    format!(
        "[0:v]scale={}:{}:force_original_aspect_ratio=decrease,pad={}:{}:(ow-iw)/2:(oh-ih)/2[top];\
         [1:v]scale={}:{}:force_original_aspect_ratio=decrease,pad={}:{}:(ow-iw)/2:(oh-ih)/2[bottom];\
         [top][bottom]vstack",
        top_width, top_height, top_width, top_height,
        bottom_width, bottom_height, bottom_width, bottom_height
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vstack_filter_contains_dimensions() {
        let filter = filter_vstack(1080, 960, 1080, 960);
        assert!(filter.contains("vstack"));
        assert!(filter.contains("1080"));
    }
}
