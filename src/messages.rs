/// Language for user-facing status text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl Locale {
    pub fn not_found(self) -> &'static str {
        match self {
            Locale::En => "No QR code found.",
            Locale::Ko => "QR 코드를 찾을 수 없습니다.",
        }
    }

    pub fn unreadable(self) -> &'static str {
        match self {
            Locale::En => "The file could not be read as an image.",
            Locale::Ko => "이미지를 읽을 수 없습니다.",
        }
    }

    pub fn load_failed(self) -> &'static str {
        match self {
            Locale::En => "Failed to generate the QR code.",
            Locale::Ko => "QR 코드 생성 중 오류가 발생했습니다.",
        }
    }

    pub fn download_failed(self) -> &'static str {
        match self {
            Locale::En => "An error occurred while downloading.",
            Locale::Ko => "다운로드 중 오류가 발생했습니다.",
        }
    }
}
