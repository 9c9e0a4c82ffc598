// ABOUTME: Media generation types for brand asset requests
// ABOUTME: Aspect ratios, quality tiers, generated images and video locators

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        let options: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        format!("'{}' is not one of {}", wanted, options.join(", "))
                    })
            }
        }
    };
}

labelled_enum!(
    /// Aspect ratios accepted for image generation
    ImageAspectRatio {
        Square => "1:1",
        Portrait => "3:4",
        Landscape => "4:3",
        Mobile => "9:16",
        Cinema => "16:9",
        Ultrawide => "21:9",
    }
);

labelled_enum!(
    /// Aspect ratios accepted for video generation
    VideoAspectRatio {
        Landscape => "16:9",
        Portrait => "9:16",
    }
);

labelled_enum!(
    /// Output resolution tier for images
    ImageQuality {
        Standard => "1K",
        High => "2K",
        Ultra => "4K",
    }
);

impl Default for ImageAspectRatio {
    fn default() -> Self {
        ImageAspectRatio::Cinema
    }
}

impl Default for VideoAspectRatio {
    fn default() -> Self {
        VideoAspectRatio::Landscape
    }
}

impl Default for ImageQuality {
    fn default() -> Self {
        ImageQuality::Standard
    }
}

/// An inline image returned by the backend, base64-encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: String,
}

impl GeneratedImage {
    /// Self-describing form, embeddable directly as an image source
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }

    /// File extension matching the MIME type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

/// Download locator for a finished video job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaReference {
    pub uri: String,
}

impl MediaReference {
    /// Attach the credential the download endpoint expects
    pub fn with_api_key(uri: &str, api_key: &str) -> Self {
        let separator = if uri.contains('?') { '&' } else { '?' };
        Self {
            uri: format!("{}{}key={}", uri, separator, api_key),
        }
    }
}
