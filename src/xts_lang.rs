// Multi-language support module
// Provides localized UI strings for English and Korean with an extensible design

#[derive(Clone)]
pub struct Assets {
    // Menu items
    pub menu_help: &'static str,
    pub menu_new: &'static str,
    pub menu_records: &'static str,
    pub menu_setup: &'static str,
    pub menu_options: &'static str,
    pub menu_about: &'static str,
    pub menu_exit: &'static str,

    // Setup modal
    pub setup_players_label: &'static str,
    pub setup_computers_label_fmt: &'static str, // "Computers (0-{}):"
    pub setup_ladders_label: &'static str,
    pub setup_snakes_label: &'static str,

    // Options modal
    pub opt_ascii_icons: &'static str,
    pub opt_language: &'static str,

    // Help modal
    pub help_controls: &'static str,
    pub help_roll: &'static str,
    pub help_menu: &'static str,
    pub help_exit: &'static str,

    // Records modal
    pub rec_best_rolls: &'static str,
    pub rec_players_fmt: &'static str, // "{} players"
    pub rec_no_record: &'static str,

    // Win modal
    pub win_title: &'static str,
    pub win_message_fmt: &'static str,      // "{} wins!"
    pub win_rolls_fmt: &'static str,        // "Won in {} rolls"
    pub win_rolls_record_fmt: &'static str, // "Won in {} rolls (New Record!)"

    // About modal
    pub about_description: &'static str,
    pub about_version_fmt: &'static str, // "v{} by {}"

    // Status bar
    pub status_turn_fmt: &'static str, // "{}'s turn"
    pub status_dice_label: &'static str,
    pub status_dice_empty: &'static str,
    pub evt_ladder_fmt: &'static str, // "Ladder! {} -> {}"
    pub evt_snake_fmt: &'static str,  // "Snake! {} -> {}"

    // Player naming
    pub name_player_fmt: &'static str, // "Player {}"
    pub name_computer: &'static str,
    pub name_computer_fmt: &'static str, // "Computer {}"

    // Buttons
    pub btn_ok: &'static str,
    pub btn_close: &'static str,

    // Terminal size messages
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2: &'static str,
    pub tsmsg_title: &'static str,

    // Language names for selection
    pub lang_english: &'static str,
    pub lang_korean: &'static str,
}

/// Returns English language assets
pub fn english_assets() -> Assets {
    Assets {
        // Menu items
        menu_help: "Help",
        menu_new: "New",
        menu_records: "Records",
        menu_setup: "Setup",
        menu_options: "Options",
        menu_about: "About",
        menu_exit: "Exit",

        // Setup modal
        setup_players_label: "Players (2-4):",
        setup_computers_label_fmt: "Computers (0-{}):",
        setup_ladders_label: "Ladders (5-20):",
        setup_snakes_label: "Snakes (5-20):",

        // Options modal
        opt_ascii_icons: "ASCII icons",
        opt_language: "🌐 Language",

        // Help modal
        help_controls: " Controls:",
        help_roll: "  Space | Enter - roll the dice",
        help_menu: "  Mouse | F-keys - menu actions",
        help_exit: "  Esc           - close dialog / exit",

        // Records modal
        rec_best_rolls: " Fewest rolls to win:",
        rec_players_fmt: "{} players",
        rec_no_record: "-",

        // Win modal
        win_title: "Game Over",
        win_message_fmt: "{} wins!",
        win_rolls_fmt: "Won in {} rolls",
        win_rolls_record_fmt: "Won in {} rolls (New Record!)",

        // About modal
        about_description: "A terminal-based Snakes and Ladders board game",
        about_version_fmt: "v{} by {}",

        // Status bar
        status_turn_fmt: "{}'s turn",
        status_dice_label: "Dice",
        status_dice_empty: "-",
        evt_ladder_fmt: "Ladder! {} -> {}",
        evt_snake_fmt: "Snake! {} -> {}",

        // Player naming
        name_player_fmt: "Player {}",
        name_computer: "Computer",
        name_computer_fmt: "Computer {}",

        // Buttons
        btn_ok: " OK ",
        btn_close: " CLOSE ",

        // Terminal size messages
        tsmsg_line1: "Terminal layout too small",
        tsmsg_line2: "Minimum size required: {} x {}",
        tsmsg_title: "Resize needed",

        // Language names
        lang_english: "English",
        lang_korean: "한국어",
    }
}

/// Returns Korean language assets
pub fn korean_assets() -> Assets {
    Assets {
        // Menu items
        menu_help: "도움말",
        menu_new: "새 게임",
        menu_records: "기록",
        menu_setup: "게임 설정",
        menu_options: "옵션",
        menu_about: "정보",
        menu_exit: "종료",

        // Setup modal
        setup_players_label: "총 플레이어 수 (2-4):",
        setup_computers_label_fmt: "컴퓨터 수 (0-{}):",
        setup_ladders_label: "사다리 개수 (5-20):",
        setup_snakes_label: "뱀 개수 (5-20):",

        // Options modal
        opt_ascii_icons: "ASCII 아이콘",
        opt_language: "🌐 언어",

        // Help modal
        help_controls: " 조작법:",
        help_roll: "  스페이스 | 엔터 - 주사위 굴리기",
        help_menu: "  마우스 | F키    - 메뉴 기능",
        help_exit: "  Esc             - 창 닫기 / 종료",

        // Records modal
        rec_best_rolls: " 최소 주사위 횟수:",
        rec_players_fmt: "{}인",
        rec_no_record: "-",

        // Win modal
        win_title: "게임 종료",
        win_message_fmt: "{}의 승리!",
        win_rolls_fmt: "주사위 {}회 만에 승리",
        win_rolls_record_fmt: "주사위 {}회 만에 승리 (신기록!)",

        // About modal
        about_description: "터미널 기반 뱀과 사다리 보드 게임",
        about_version_fmt: "v{} 제작 {}",

        // Status bar
        status_turn_fmt: "{}의 턴입니다",
        status_dice_label: "주사위",
        status_dice_empty: "-",
        evt_ladder_fmt: "사다리 발견! {} -> {}",
        evt_snake_fmt: "뱀 발견! {} -> {}",

        // Player naming
        name_player_fmt: "플레이어 {}",
        name_computer: "컴퓨터",
        name_computer_fmt: "컴퓨터 {}",

        // Buttons
        btn_ok: " 확인 ",
        btn_close: " 닫기 ",

        // Terminal size messages
        tsmsg_line1: "터미널 화면이 너무 작습니다",
        tsmsg_line2: "최소 필요 크기: {} x {}",
        tsmsg_title: "크기 조정 필요",

        // Language names
        lang_english: "English",
        lang_korean: "한국어",
    }
}

/// Substitute "{}" placeholders left to right
pub fn fill(fmt: &str, args: &[&str]) -> String {
    let mut out = fmt.to_string();
    for arg in args {
        out = out.replacen("{}", arg, 1);
    }
    out
}

/// Main language manager struct
/// Holds the current language code and active string assets
pub struct Lang {
    pub current_lang: String,
    pub assets: Assets,
}

impl Lang {
    /// Creates a new Lang instance from a language code
    /// Normalizes input (e.g., "ko-KR" → "ko") and defaults to English for unsupported languages
    pub fn new(lang_code: &str) -> Self {
        let normalized = lang_code.to_lowercase();
        let code = if normalized.starts_with("ko") {
            "ko"
        } else {
            "en"
        };

        Lang {
            current_lang: code.to_string(),
            assets: if code == "ko" {
                korean_assets()
            } else {
                english_assets()
            },
        }
    }

    /// Switches the current language and reloads all string assets
    /// Used when the user changes language in the options menu
    pub fn switch_to(&mut self, lang_code: &str) {
        let normalized = lang_code.to_lowercase();
        let code = if normalized.starts_with("ko") {
            "ko"
        } else {
            "en"
        };

        self.current_lang = code.to_string();
        self.assets = if code == "ko" {
            korean_assets()
        } else {
            english_assets()
        };
    }

    /// Localized display name for a player index.
    /// Computers occupy the highest indexes; a lone computer stays unnumbered.
    pub fn player_name(&self, index: usize, players: usize, computers: usize) -> String {
        let split = players - computers;
        if index >= split {
            if computers > 1 {
                fill(self.assets.name_computer_fmt, &[&(index - split + 1).to_string()])
            } else {
                self.assets.name_computer.to_string()
            }
        } else {
            fill(self.assets.name_player_fmt, &[&(index + 1).to_string()])
        }
    }

    /// Format an ISO date (YYYY-MM-DD) according to the current language
    /// English: MM/DD/YYYY (e.g., "01/22/2026")
    /// Korean: YYYY년 MM월 DD일 (e.g., "2026년 01월 22일")
    pub fn format_date(&self, iso_date: &str) -> String {
        let parts: Vec<&str> = iso_date.split('-').collect();
        if parts.len() != 3 {
            return iso_date.to_string();
        }

        if self.current_lang == "ko" {
            format!("{}년 {}월 {}일", parts[0], parts[1], parts[2])
        } else {
            format!("{}/{}/{}", parts[1], parts[2], parts[0])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_names_split_humans_and_computers() {
        let lang = Lang::new("en");
        // 4 players, 2 computers: indexes 2 and 3 are automated
        assert_eq!(lang.player_name(0, 4, 2), "Player 1");
        assert_eq!(lang.player_name(1, 4, 2), "Player 2");
        assert_eq!(lang.player_name(2, 4, 2), "Computer 1");
        assert_eq!(lang.player_name(3, 4, 2), "Computer 2");
        // a lone computer is unnumbered
        assert_eq!(lang.player_name(1, 2, 1), "Computer");
    }

    #[test]
    fn language_codes_normalize() {
        assert_eq!(Lang::new("ko-KR").current_lang, "ko");
        assert_eq!(Lang::new("en-US").current_lang, "en");
        assert_eq!(Lang::new("fr").current_lang, "en");
    }

    #[test]
    fn fill_substitutes_in_order() {
        assert_eq!(fill("{} -> {}", &["3", "15"]), "3 -> 15");
        assert_eq!(fill("no holes", &["x"]), "no holes");
    }
}
