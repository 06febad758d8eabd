/// Fixed sizing profile for one viewport bracket. All values are CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutProfile {
    pub card_width: u32,
    pub grid_gap: u32,
    pub container_padding: u32,
    pub card_padding: u32,
}

/// Maps a viewport width to its sizing profile.
///
/// Total over all widths; the brackets are a deliberate superset of the
/// 768px grid/mobile split in the placement engine and must not be merged
/// with it.
pub fn resolve_config(viewport_width: u32) -> LayoutProfile {
    if viewport_width >= 1920 {
        LayoutProfile {
            card_width: 340,
            grid_gap: 24,
            container_padding: 32,
            card_padding: 18,
        }
    } else if viewport_width >= 1200 {
        LayoutProfile {
            card_width: 320,
            grid_gap: 20,
            container_padding: 24,
            card_padding: 16,
        }
    } else if viewport_width >= 768 {
        LayoutProfile {
            card_width: 300,
            grid_gap: 16,
            container_padding: 20,
            card_padding: 16,
        }
    } else if viewport_width >= 600 {
        LayoutProfile {
            card_width: 280,
            grid_gap: 16,
            container_padding: 16,
            card_padding: 14,
        }
    } else {
        LayoutProfile {
            card_width: 260,
            grid_gap: 12,
            container_padding: 12,
            card_padding: 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brackets_map_to_expected_card_widths() {
        assert_eq!(resolve_config(2560).card_width, 340);
        assert_eq!(resolve_config(1920).card_width, 340);
        assert_eq!(resolve_config(1919).card_width, 320);
        assert_eq!(resolve_config(1200).card_width, 320);
        assert_eq!(resolve_config(1199).card_width, 300);
        assert_eq!(resolve_config(768).card_width, 300);
        assert_eq!(resolve_config(767).card_width, 280);
        assert_eq!(resolve_config(600).card_width, 280);
        assert_eq!(resolve_config(599).card_width, 260);
        assert_eq!(resolve_config(0).card_width, 260);
    }

    #[test]
    fn paddings_shrink_with_the_viewport() {
        let wide = resolve_config(1920);
        let narrow = resolve_config(320);
        assert!(wide.container_padding > narrow.container_padding);
        assert!(wide.card_padding > narrow.card_padding);
        assert!(wide.grid_gap > narrow.grid_gap);
    }
}
