use serde::Serialize;

/// A named preset sent to the image model to stylize a captured frame.
pub struct Filter {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}

/// Unknown filter ids fall back to the first preset.
pub const FILTERS: [Filter; 5] = [
    Filter {
        id: "soft-retro",
        label: "Soft Retro",
        prompt: "Apply a subtle soft-retro photographic film look to this image. \
            Add: warm tone (amber/sepia tint), slight desaturation (85% of original), gentle contrast boost (+5%), \
            fine film grain texture, soft vignette around edges. \
            Preserve: original composition, all facial features, skin tones, lighting, background elements, objects. \
            Do not: add, remove, or alter any objects, faces, or composition. Only apply color grading. \
            Style: photographic color correction only, natural appearance.",
    },
    Filter {
        id: "golden-hour",
        label: "Golden Hour",
        prompt: "Apply a subtle golden hour photographic look to this image. \
            Add: warm golden tone (sunrise/sunset colors), increased saturation (+20%), gentle contrast (+8%), \
            slight brightness lift (+5%), amber color cast. \
            Preserve: original composition, all facial features, skin tones, lighting, background elements, objects. \
            Do not: add, remove, or alter any objects, faces, or composition. Only apply color grading. \
            Style: photographic color correction only, natural golden hour lighting.",
    },
    Filter {
        id: "porcelain-glow",
        label: "Porcelain Glow",
        prompt: "Apply a subtle porcelain skin photographic look to this image. \
            Add: soft brightness (+8%), reduced saturation (-10%), gentle contrast reduction (-5%), \
            slight blur for smoothness, gentle glow effect. \
            Preserve: original composition, all facial features, skin tones, lighting, background elements, objects. \
            Do not: add, remove, or alter any objects, faces, or composition. Only apply color grading. \
            Style: photographic beauty filter, soft and elegant.",
    },
    Filter {
        id: "black-white-film",
        label: "Black & White",
        prompt: "Convert this image to classic black and white photography. \
            Add: grayscale conversion, increased contrast (+12%), slight brightness adjustment (-2%). \
            Preserve: original composition, all facial features, details, lighting, background elements, objects. \
            Do not: add, remove, or alter any objects, faces, or composition. Only convert to monochrome. \
            Style: classic black and white photographic film look.",
    },
    Filter {
        id: "urban-high-contrast",
        label: "Urban High Contrast",
        prompt: "Apply a subtle urban high-contrast photographic look to this image. \
            Add: increased contrast (+25%), reduced saturation (-20%), slight brightness reduction (-5%), \
            cool color shift (slightly towards blue/teal). \
            Preserve: original composition, all facial features, skin tones, lighting, background elements, objects. \
            Do not: add, remove, or alter any objects, faces, or composition. Only apply color grading. \
            Style: urban street photography aesthetic, dramatic but natural.",
    },
];

pub fn find(id: &str) -> Option<&'static Filter> {
    FILTERS.iter().find(|filter| filter.id == id)
}

pub fn prompt_for(id: &str) -> &'static str {
    find(id).unwrap_or(&FILTERS[0]).prompt
}

#[derive(Serialize)]
pub struct FilterInfo {
    pub id: &'static str,
    pub label: &'static str,
}

pub fn list() -> Vec<FilterInfo> {
    FILTERS
        .iter()
        .map(|filter| FilterInfo {
            id: filter.id,
            label: filter.label,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_resolve_to_their_prompt() {
        assert!(prompt_for("golden-hour").contains("golden hour"));
        assert!(prompt_for("black-white-film").contains("black and white"));
    }

    #[test]
    fn unknown_ids_fall_back_to_soft_retro() {
        assert_eq!(prompt_for("does-not-exist"), prompt_for("soft-retro"));
    }

    #[test]
    fn listing_exposes_all_presets() {
        let listed = list();
        assert_eq!(listed.len(), FILTERS.len());
        assert!(listed.iter().any(|f| f.id == "porcelain-glow"));
    }
}
