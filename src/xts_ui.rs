use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use rand::prelude::*;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Terminal;
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use crate::xts_color::{ladder_color, player_color, snake_color, WTMatch};
use crate::xts_game::{
    save_config, Config, Feature, Game, TurnOutcome, BOARD_SIZE, GRID_DIM, MAX_FEATURES,
    MAX_PLAYERS, MIN_FEATURES, MIN_PLAYERS,
};
use crate::xts_lang::{fill, Lang};
use unicode_width::UnicodeWidthStr;

// Pause before an automatic (computer) roll fires; chained when several
// computer players move in a row
const AUTO_TURN_DELAY: Duration = Duration::from_millis(1000);

// Group runtime UI variables into a single structure to simplify passing them around
#[derive(Debug)]
struct UiState {
    clicked_index: Option<usize>,
    click_instant: Option<Instant>,
    hover_index: Option<usize>,
    modal_close_hovered: bool,
    modal_close_pressed: bool,
    modal_rect: Option<Rect>,
    modal_close_rect: Option<Rect>,
    showing_setup: bool,
    showing_help: bool,
    showing_record: bool,
    showing_options: bool,
    showing_about: bool,
    showing_win: bool,
    options_ascii: bool,
    options_lang: usize, // 0=English, 1=Korean
    options_focus: Option<u8>,
    options_ascii_rect: Option<Rect>,
    options_lang_rect: Option<Rect>,
    // setup modal input fields: 0=players, 1=computers, 2=ladders, 3=snakes
    setup_input_mode: Option<u8>,
    setup_players_str: String,
    setup_computers_str: String,
    setup_ladders_str: String,
    setup_snakes_str: String,
    setup_rects: [Option<Rect>; 4],
    setup_invalid_field: Option<(u8, Instant)>, // (field_index, flash_start_time) for error flashing
    // last finished roll, shown in the status row
    last_outcome: Option<TurnOutcome>,
    // board square flashed briefly after a move
    flash_square: Option<(u16, Instant)>,
    // deadline for the next automatic computer roll
    auto_due: Option<Instant>,
    last_run_new_record: bool,
    exit_menu_item_down: bool, // Track when exit label is pressed, wait for release
    exit_status_hovered: bool,
}

impl UiState {
    fn new() -> Self {
        UiState {
            clicked_index: None,
            click_instant: None,
            hover_index: None,
            modal_close_hovered: false,
            modal_close_pressed: false,
            modal_rect: None,
            modal_close_rect: None,
            showing_setup: false,
            showing_help: false,
            showing_record: false,
            showing_options: false,
            showing_about: false,
            showing_win: false,
            options_ascii: false,
            options_lang: 0,
            options_focus: None,
            options_ascii_rect: None,
            options_lang_rect: None,
            setup_input_mode: None,
            setup_players_str: String::new(),
            setup_computers_str: String::new(),
            setup_ladders_str: String::new(),
            setup_snakes_str: String::new(),
            setup_rects: [None; 4],
            setup_invalid_field: None,
            last_outcome: None,
            flash_square: None,
            auto_due: None,
            last_run_new_record: false,
            exit_menu_item_down: false,
            exit_status_hovered: false,
        }
    }

    fn reset_after_new_game(&mut self) {
        self.clicked_index = None;
        self.click_instant = None;
        self.hover_index = None;
        self.modal_close_hovered = false;
        self.modal_close_pressed = false;
        self.modal_rect = None;
        self.modal_close_rect = None;
        self.showing_setup = false;
        self.showing_help = false;
        self.showing_record = false;
        self.showing_options = false;
        self.showing_about = false;
        self.showing_win = false;
        self.options_focus = None;
        self.options_ascii_rect = None;
        self.options_lang_rect = None;
        self.setup_input_mode = None;
        self.setup_rects = [None; 4];
        self.setup_invalid_field = None;
        self.last_outcome = None;
        self.flash_square = None;
        self.auto_due = None;
        self.last_run_new_record = false;
        self.exit_menu_item_down = false;
        self.exit_status_hovered = false;
    }
}

fn reset_ui_after_new_game(game: &Game, ui: &mut UiState) {
    ui.reset_after_new_game();
    // an automated opener still gets its presentation pause
    if game.is_computer(game.current) {
        ui.auto_due = Some(Instant::now() + AUTO_TURN_DELAY);
    }
}

fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column <= rect.x + rect.width.saturating_sub(1)
        && row >= rect.y
        && row <= rect.y + rect.height.saturating_sub(1)
}

/// Publish a finished roll: status message, board flash, record keeping,
/// the win modal, and the deadline for a following computer turn
fn present_outcome(out: TurnOutcome, game: &Game, cfg: &mut Config, ui: &mut UiState) {
    ui.last_outcome = Some(out);
    ui.flash_square = Some((out.final_pos.min(BOARD_SIZE), Instant::now()));
    if out.won {
        ui.auto_due = None;
        // only human wins count toward the fewest-rolls records
        if !game.is_computer(out.player) {
            let rolls = game.rolls[out.player];
            let cur = cfg.get_record(game.players);
            if cur.is_none() || rolls < cur.unwrap() {
                ui.last_run_new_record = true;
                cfg.set_record(game.players, rolls);
                save_config(cfg);
            }
        }
        ui.showing_win = true;
    } else if game.is_computer(game.current) {
        ui.auto_due = Some(Instant::now() + AUTO_TURN_DELAY);
    } else {
        ui.auto_due = None;
    }
}

/// Prefill the setup fields from the saved configuration and open the modal
fn open_setup(cfg: &Config, ui: &mut UiState) {
    ui.setup_players_str = cfg.players.to_string();
    ui.setup_computers_str = cfg.computers.to_string();
    ui.setup_ladders_str = cfg.ladders.to_string();
    ui.setup_snakes_str = cfg.snakes.to_string();
    ui.setup_input_mode = Some(0);
    ui.setup_invalid_field = None;
    ui.showing_setup = true;
}

fn open_options(cfg: &Config, lang: &Lang, ui: &mut UiState) {
    ui.options_ascii = cfg.ascii_icons;
    ui.options_lang = if lang.current_lang == "ko" { 1 } else { 0 };
    ui.options_focus = Some(0);
    ui.showing_options = true;
}

/// Validate the setup fields; on success persist them and start a new game,
/// otherwise flash the first offending field
fn apply_setup(cfg: &mut Config, game: &mut Game, ui: &mut UiState, rng: &mut impl Rng) {
    let players = ui.setup_players_str.trim().parse::<usize>().unwrap_or(0);
    let computers = ui.setup_computers_str.trim().parse::<usize>().unwrap_or(usize::MAX);
    let ladders = ui.setup_ladders_str.trim().parse::<usize>().unwrap_or(0);
    let snakes = ui.setup_snakes_str.trim().parse::<usize>().unwrap_or(0);

    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
        ui.setup_invalid_field = Some((0, Instant::now()));
    } else if computers >= players {
        // at least one human seat stays
        ui.setup_invalid_field = Some((1, Instant::now()));
    } else if !(MIN_FEATURES..=MAX_FEATURES).contains(&ladders) {
        ui.setup_invalid_field = Some((2, Instant::now()));
    } else if !(MIN_FEATURES..=MAX_FEATURES).contains(&snakes) {
        ui.setup_invalid_field = Some((3, Instant::now()));
    } else {
        cfg.players = players;
        cfg.computers = computers;
        cfg.ladders = ladders;
        cfg.snakes = snakes;
        save_config(cfg);
        *game = Game::new(players, computers, ladders, snakes, rng);
        reset_ui_after_new_game(game, ui);
        ui.showing_setup = false;
        ui.setup_input_mode = None;
        ui.modal_rect = None;
        ui.modal_close_rect = None;
        ui.modal_close_pressed = false;
    }
}

/// Apply option changes, persist them, and reload language assets if needed
fn apply_options(cfg: &mut Config, lang: &mut Lang, ui: &mut UiState) {
    cfg.ascii_icons = ui.options_ascii;
    let code = if ui.options_lang == 1 { "ko" } else { "en" };
    cfg.language = code.to_string();
    lang.switch_to(code);
    save_config(cfg);
    ui.showing_options = false;
    ui.modal_rect = None;
    ui.modal_close_rect = None;
    ui.modal_close_pressed = false;
    ui.hover_index = None;
    ui.options_focus = None;
}

/// Dismiss the win modal and deal a fresh board with the same settings
fn close_win_and_restart(cfg: &Config, game: &mut Game, ui: &mut UiState, rng: &mut impl Rng) {
    ui.showing_win = false;
    ui.modal_rect = None;
    ui.modal_close_rect = None;
    ui.modal_close_pressed = false;
    ui.hover_index = None;
    *game = Game::new(cfg.players, cfg.computers, cfg.ladders, cfg.snakes, rng);
    reset_ui_after_new_game(game, ui);
}

// Left side of the status row: whose turn it is, the last dice value, and a
// note when the last move hit a ladder or snake
fn status_left_text(game: &Game, ui: &UiState, lang: &Lang) -> String {
    let turn_text = if let Some(w) = game.winner {
        fill(lang.assets.win_message_fmt, &[&lang.player_name(w, game.players, game.computers)])
    } else {
        fill(lang.assets.status_turn_fmt, &[&lang.player_name(game.current, game.players, game.computers)])
    };
    let dice_str = match ui.last_outcome {
        Some(out) => out.roll.to_string(),
        None => lang.assets.status_dice_empty.to_string(),
    };
    let mut text = format!(" {}   {}: {}", turn_text, lang.assets.status_dice_label, dice_str);
    if let Some(out) = ui.last_outcome {
        if let Some((kind, end)) = out.jump {
            let fmt = match kind {
                Feature::Ladder => lang.assets.evt_ladder_fmt,
                Feature::Snake => lang.assets.evt_snake_fmt,
            };
            text.push_str("   ");
            text.push_str(&fill(fmt, &[&out.landed.to_string(), &end.to_string()]));
        }
    }
    text.push(' ');
    text
}

pub fn run(cfg: &mut Config, lang: &mut Lang) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut rng = thread_rng();
    let mut game = Game::new(cfg.players, cfg.computers, cfg.ladders, cfg.snakes, &mut rng);
    // grouped runtime UI state
    let mut ui = UiState::new();
    let mut menu_rect: Option<Rect> = None;
    let mut status_rect: Option<Rect> = None;
    let mut exit_requested: bool = false;

    // Glyph computation helper: token / ladder / snake markers per icon setting
    let make_glyphs = |ascii: bool| if ascii { ("o", "^", "v") } else { ("●", "↑", "↓") };

    // Centralized color definitions
    let board_bg_a = Color::DarkGray.wtmatch();
    let board_bg_b = Color::Black.wtmatch();
    let num_fg = Color::Gray.wtmatch();
    let flash_bg = Color::Red.wtmatch();
    let flash_fg = Color::White.wtmatch();
    // Menu / key label colors (centralized)
    let menu_key_fg = Color::Yellow.wtmatch();
    let menu_key_bg_hover = Color::LightBlue.wtmatch();
    let menu_key_bg_pressed = Color::Green.wtmatch();
    let menu_key_fg_pressed = Color::Black.wtmatch();

    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        // Centralized menu/key items (key, rest), rebuilt each pass so language
        // switches take effect. Esc lives here so the status row can reuse it.
        let menu_items = [
            ("F1", lang.assets.menu_help),
            ("F2", lang.assets.menu_new),
            ("F4", lang.assets.menu_records),
            ("F5", lang.assets.menu_setup),
            ("F7", lang.assets.menu_options),
            ("F9", lang.assets.menu_about),
            ("Esc", lang.assets.menu_exit),
        ];

        terminal.draw(|f| {
            let size = f.size();
            let min_twidth = 80u16;
            let min_theight = 20u16;
            // If terminal too small, render a centered warning and skip normal UI
            if size.width < min_twidth || size.height < min_theight {
                let warn_lines = vec![
                    Spans::from(Span::raw(lang.assets.tsmsg_line1)),
                    Spans::from(Span::raw(fill(
                        lang.assets.tsmsg_line2,
                        &[&min_twidth.to_string(), &min_theight.to_string()],
                    ))),
                ];
                let warn = Paragraph::new(Text::from(warn_lines))
                    .block(Block::default().borders(Borders::ALL).title(lang.assets.tsmsg_title))
                    .alignment(Alignment::Center);
                f.render_widget(Clear, size);
                let w = 40u16.min(size.width.saturating_sub(2));
                let h = 5u16.min(size.height.saturating_sub(2));
                let area = center_rect(w, h, size);
                f.render_widget(warn, area);
                return;
            }

            // layout: top menu row, center board, bottom status
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(0)
                .constraints([Constraint::Length(3), Constraint::Min(6), Constraint::Length(3)].as_ref())
                .split(size);

            // menu row (per-item styled so hover/click mapping aligns with mouse offsets)
            let mut spans_vec: Vec<Span> = Vec::new();
            for (i, (label_key, label_rest)) in menu_items.iter().take(6).enumerate() {
                if i > 0 {
                    spans_vec.push(Span::raw("   "));
                }
                let (key_style, rest_style) = if Some(i) == ui.clicked_index {
                    (Style::default().bg(menu_key_bg_pressed).fg(menu_key_fg_pressed).add_modifier(Modifier::BOLD), Style::default().bg(menu_key_bg_pressed).fg(menu_key_fg_pressed))
                } else if Some(i) == ui.hover_index {
                    (Style::default().bg(menu_key_bg_hover).fg(menu_key_fg_pressed).add_modifier(Modifier::BOLD), Style::default().bg(menu_key_bg_hover).fg(menu_key_fg_pressed))
                } else {
                    (Style::default().fg(menu_key_fg).add_modifier(Modifier::BOLD), Style::default())
                };

                spans_vec.push(Span::styled(label_key.to_string(), key_style));
                spans_vec.push(Span::styled(format!(": {}", label_rest), rest_style));
            }
            // add one-space padding left and right inside the menu block
            spans_vec.insert(0, Span::raw(" "));
            spans_vec.push(Span::raw(" "));
            let menu = Paragraph::new(Spans::from(spans_vec)).block(Block::default().borders(Borders::ALL)).alignment(Alignment::Left);
            f.render_widget(menu, chunks[0]);
            menu_rect = Some(chunks[0]);

            // status row (left info + right-aligned Esc: Exit)
            let left_text = status_left_text(&game, &ui, lang);
            let esc = menu_items[6];
            let inner_w = chunks[2].width.saturating_sub(2) as usize;
            let left_w = left_text.as_str().width();
            // account for the ": " we add when rendering the right-hand key/rest
            let right_w = esc.0.width() + 2 + esc.1.width();
            let mid_spaces = if inner_w > left_w + right_w + 1 { inner_w - left_w - right_w - 1 } else { 1 };
            let mut status_spans: Vec<Span> = Vec::new();
            status_spans.push(Span::raw(left_text));
            status_spans.push(Span::raw(" ".repeat(mid_spaces)));
            let mut key_style = Style::default().fg(menu_key_fg).add_modifier(Modifier::BOLD);
            let mut rest_style = Style::default();
            if ui.exit_menu_item_down {
                key_style = Style::default().bg(menu_key_bg_pressed).fg(menu_key_fg_pressed).add_modifier(Modifier::BOLD);
                rest_style = Style::default().bg(menu_key_bg_pressed).fg(menu_key_fg_pressed);
            } else if ui.exit_status_hovered {
                key_style = Style::default().bg(menu_key_bg_hover).fg(menu_key_fg_pressed).add_modifier(Modifier::BOLD);
                rest_style = Style::default().bg(menu_key_bg_hover).fg(menu_key_fg_pressed);
            }
            status_spans.push(Span::styled(esc.0.to_string(), key_style));
            status_spans.push(Span::styled(format!(": {}", esc.1), rest_style));
            status_spans.push(Span::raw(" "));
            let status = Paragraph::new(Text::from(Spans::from(status_spans)))
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Left);
            f.render_widget(status, chunks[2]);
            status_rect = Some(chunks[2]);

            // board area: 10x10 boustrophedon grid, 7 columns per square
            let (glyph_token, glyph_ladder, glyph_snake) = make_glyphs(cfg.ascii_icons);
            let board_area = centered_block(GRID_DIM * 7 + 4, GRID_DIM + 2, chunks[1]);
            let title = format!(" {}{}  {}{} ", glyph_ladder, game.board.ladders.len(), glyph_snake, game.board.snakes.len());
            let mut lines = vec![];
            for i in 0..GRID_DIM {
                let mut spans = vec![];
                spans.push(Span::raw(" "));
                let board_row = GRID_DIM - i - 1; // square 100 renders top-left
                for j in 0..GRID_DIM {
                    let square = if board_row % 2 == 0 {
                        board_row * GRID_DIM + j + 1
                    } else {
                        board_row * GRID_DIM + GRID_DIM - j
                    };
                    let mut bg = if (i + j) % 2 == 0 { board_bg_a } else { board_bg_b };
                    let mut cell_fg = num_fg;
                    // flash the square a move just ended on
                    let flashing = matches!(ui.flash_square, Some((fs, t0)) if fs == square && t0.elapsed() < Duration::from_millis(350));
                    if flashing {
                        bg = flash_bg;
                        cell_fg = flash_fg;
                    }
                    let num_style = Style::default().fg(cell_fg).bg(bg);
                    spans.push(Span::styled(format!("{:>3}", square), num_style));
                    // 4-column slot: player tokens, or a feature marker with its destination
                    let slot_style = Style::default().bg(bg);
                    let tokens = game.players_at(square);
                    if !tokens.is_empty() {
                        for &p in tokens.iter().take(4) {
                            spans.push(Span::styled(glyph_token.to_string(), slot_style.fg(player_color(p)).add_modifier(Modifier::BOLD)));
                        }
                        for _ in tokens.len()..4 {
                            spans.push(Span::styled(" ".to_string(), slot_style));
                        }
                    } else if let Some(&end) = game.board.ladders.get(&square) {
                        spans.push(Span::styled(format!("{}{:<3}", glyph_ladder, end), slot_style.fg(ladder_color()).add_modifier(Modifier::BOLD)));
                    } else if let Some(&end) = game.board.snakes.get(&square) {
                        spans.push(Span::styled(format!("{}{:<3}", glyph_snake, end), slot_style.fg(snake_color()).add_modifier(Modifier::BOLD)));
                    } else {
                        spans.push(Span::styled("    ".to_string(), slot_style));
                    }
                }
                spans.push(Span::raw(" "));
                lines.push(Spans::from(spans));
            }
            let paragraph = Paragraph::new(Text::from(lines))
                .block(Block::default().borders(Borders::ALL).title(title).title_alignment(Alignment::Center))
                .alignment(Alignment::Left);
            f.render_widget(paragraph, board_area);

            // modals
            ui.modal_close_rect = None;
            if ui.showing_setup {
                let mrect = centered_block(44, 12, size);
                ui.modal_rect = Some(mrect);
                f.render_widget(Clear, mrect);
                f.render_widget(Block::default().borders(Borders::ALL).title(menu_items[3].1), mrect);
                let inner = Rect::new(mrect.x + 1, mrect.y + 1, mrect.width.saturating_sub(2), mrect.height.saturating_sub(2));

                // the computers bound follows the players field as it is edited
                let p_val = ui.setup_players_str.trim().parse::<usize>().unwrap_or(0);
                let comp_max = p_val.saturating_sub(1);

                let labels = [
                    lang.assets.setup_players_label.to_string(),
                    fill(lang.assets.setup_computers_label_fmt, &[&comp_max.to_string()]),
                    lang.assets.setup_ladders_label.to_string(),
                    lang.assets.setup_snakes_label.to_string(),
                ];
                let values = [
                    &ui.setup_players_str,
                    &ui.setup_computers_str,
                    &ui.setup_ladders_str,
                    &ui.setup_snakes_str,
                ];

                // Use fixed label width for alignment (display width, labels may be wide)
                let label_width = 24usize;
                let is_flashing = matches!(ui.setup_invalid_field, Some((_, t0)) if t0.elapsed() < Duration::from_millis(600));

                let mut lines = vec![Spans::from(Span::raw(""))];
                for (idx, label) in labels.iter().enumerate() {
                    let field_style = if ui.setup_input_mode == Some(idx as u8) {
                        Style::default().bg(Color::Yellow).fg(Color::Black)
                    } else {
                        Style::default().bg(Color::DarkGray)
                    };
                    let label_style = if is_flashing && matches!(ui.setup_invalid_field, Some((fi, _)) if fi == idx as u8) {
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    let pad = label_width.saturating_sub(label.as_str().width());
                    lines.push(Spans::from(vec![
                        Span::raw(" "),
                        Span::styled(format!("{}{}", label, " ".repeat(pad)), label_style),
                        Span::styled(format!("{:<2}", values[idx]), field_style),
                    ]));
                    if idx < 3 {
                        lines.push(Spans::from(Span::raw("")));
                    }
                }
                let p = Paragraph::new(Text::from(lines)).alignment(Alignment::Left);
                f.render_widget(p, inner);

                // Input field rectangles for mouse click detection (rows 1, 3, 5, 7)
                for idx in 0..4u16 {
                    ui.setup_rects[idx as usize] = Some(Rect::new(inner.x + 1 + label_width as u16, inner.y + 1 + idx * 2, 2, 1));
                }

                // OK button at the last row before the bottom border
                let btn_w = lang.assets.btn_ok.width() as u16;
                let bx = mrect.x + (mrect.width.saturating_sub(btn_w)) / 2;
                let by = mrect.y + mrect.height.saturating_sub(2);
                let btn_rect = Rect::new(bx, by, btn_w, 1);
                ui.modal_close_rect = Some(btn_rect);
                let mut btn_style = Style::default().bg(Color::Gray).fg(Color::Black).add_modifier(Modifier::BOLD);
                if ui.modal_close_pressed { btn_style = Style::default().bg(Color::Green).fg(Color::Black).add_modifier(Modifier::BOLD); }
                else if ui.modal_close_hovered { btn_style = Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD); }
                let btn = Paragraph::new(Spans::from(Span::styled(lang.assets.btn_ok, btn_style))).alignment(Alignment::Center).block(Block::default());
                f.render_widget(btn, btn_rect);
            }

            if ui.showing_options {
                let mrect = centered_block(34, 8, size);
                ui.modal_rect = Some(mrect);
                f.render_widget(Clear, mrect);
                f.render_widget(Block::default().borders(Borders::ALL).title(menu_items[4].1), mrect);
                let inner = Rect::new(mrect.x + 1, mrect.y + 1, mrect.width.saturating_sub(2), mrect.height.saturating_sub(2));
                let cb = if ui.options_ascii { "[x]" } else { "[ ]" };
                let lang_name = if ui.options_lang == 1 { lang.assets.lang_korean } else { lang.assets.lang_english };
                let line0 = format!("{} {}", cb, lang.assets.opt_ascii_icons);
                let line1 = format!("{}: {}", lang.assets.opt_language, lang_name);
                let focus_style = Style::default().bg(menu_key_bg_hover).fg(menu_key_fg_pressed).add_modifier(Modifier::BOLD);
                let mut lines = vec![Spans::from(Span::raw(""))];
                lines.push(Spans::from(vec![Span::raw(" "), if ui.options_focus == Some(0) { Span::styled(line0.clone(), focus_style) } else { Span::raw(line0.clone()) }]));
                lines.push(Spans::from(vec![Span::raw(" "), if ui.options_focus == Some(1) { Span::styled(line1.clone(), focus_style) } else { Span::raw(line1.clone()) }]));
                let p = Paragraph::new(Text::from(lines)).alignment(Alignment::Left);
                f.render_widget(p, inner);
                // clickable areas cover the visible label text only
                ui.options_ascii_rect = Some(Rect::new(inner.x + 1, inner.y + 1, line0.as_str().width() as u16, 1));
                ui.options_lang_rect = Some(Rect::new(inner.x + 1, inner.y + 2, line1.as_str().width() as u16, 1));
                // OK button
                let btn_w = lang.assets.btn_ok.width() as u16;
                let bx = inner.x + (inner.width.saturating_sub(btn_w)) / 2;
                let by = inner.y + inner.height.saturating_sub(1);
                let btn_rect = Rect::new(bx, by, btn_w, 1);
                ui.modal_close_rect = Some(btn_rect);
                let mut btn_style = Style::default().bg(Color::Gray).fg(Color::Black).add_modifier(Modifier::BOLD);
                if ui.modal_close_pressed { btn_style = Style::default().bg(Color::Green).fg(Color::Black).add_modifier(Modifier::BOLD); }
                else if ui.modal_close_hovered { btn_style = Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD); }
                let btn = Paragraph::new(Spans::from(Span::styled(lang.assets.btn_ok, btn_style))).alignment(Alignment::Center).block(Block::default());
                f.render_widget(btn, btn_rect);
            }

            if ui.showing_about {
                let mrect = centered_block(48, 9, size);
                ui.modal_rect = Some(mrect);
                f.render_widget(Clear, mrect);
                f.render_widget(Block::default().borders(Borders::ALL).title(menu_items[5].1), mrect);
                let inner = Rect::new(mrect.x + 1, mrect.y + 1, mrect.width.saturating_sub(2), mrect.height.saturating_sub(2));
                let lines = vec![
                    Spans::from(Span::raw("")),
                    Spans::from(Span::raw(lang.assets.about_description)),
                    Spans::from(Span::raw("")),
                    Spans::from(Span::raw(fill(lang.assets.about_version_fmt, &[env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_AUTHORS")]))),
                ];
                let p = Paragraph::new(Text::from(lines)).alignment(Alignment::Center);
                f.render_widget(p, inner);
                // close button
                let btn_w = lang.assets.btn_close.width() as u16;
                let bx = inner.x + (inner.width.saturating_sub(btn_w)) / 2;
                let by = inner.y + inner.height.saturating_sub(1);
                let btn_rect = Rect::new(bx, by, btn_w, 1);
                ui.modal_close_rect = Some(btn_rect);
                let mut btn_style = Style::default().bg(Color::Gray).fg(Color::Black).add_modifier(Modifier::BOLD);
                if ui.modal_close_pressed { btn_style = Style::default().bg(Color::Green).fg(Color::Black).add_modifier(Modifier::BOLD); }
                else if ui.modal_close_hovered { btn_style = Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD); }
                let btn = Paragraph::new(Spans::from(Span::styled(lang.assets.btn_close, btn_style))).alignment(Alignment::Center).block(Block::default());
                f.render_widget(btn, btn_rect);
            }

            if ui.showing_help {
                let mrect = centered_block(48, 10, size);
                ui.modal_rect = Some(mrect);
                f.render_widget(Clear, mrect);
                f.render_widget(Block::default().borders(Borders::ALL).title(menu_items[0].1), mrect);
                let inner = Rect::new(mrect.x + 1, mrect.y + 1, mrect.width.saturating_sub(2), mrect.height.saturating_sub(2));
                let help_lines = vec![
                    Spans::from(Span::raw("")),
                    Spans::from(Span::raw(lang.assets.help_controls)),
                    Spans::from(Span::raw(lang.assets.help_roll)),
                    Spans::from(Span::raw(lang.assets.help_menu)),
                    Spans::from(Span::raw(lang.assets.help_exit)),
                ];
                let p = Paragraph::new(Text::from(help_lines)).alignment(Alignment::Left);
                f.render_widget(p, inner);
                // close button
                let btn_w = lang.assets.btn_close.width() as u16;
                let bx = inner.x + (inner.width.saturating_sub(btn_w)) / 2;
                let by = inner.y + inner.height.saturating_sub(1);
                let btn_rect = Rect::new(bx, by, btn_w, 1);
                ui.modal_close_rect = Some(btn_rect);
                let mut btn_style = Style::default().bg(Color::Gray).fg(Color::Black).add_modifier(Modifier::BOLD);
                if ui.modal_close_pressed { btn_style = Style::default().bg(Color::Green).fg(Color::Black).add_modifier(Modifier::BOLD); }
                else if ui.modal_close_hovered { btn_style = Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD); }
                let btn = Paragraph::new(Spans::from(Span::styled(lang.assets.btn_close, btn_style))).alignment(Alignment::Center).block(Block::default());
                f.render_widget(btn, btn_rect);
            }

            if ui.showing_record {
                let rb = centered_block(40, 10, size);
                ui.modal_rect = Some(rb);
                f.render_widget(Clear, rb);
                let mut rec_lines = vec![Spans::from(Span::raw("")), Spans::from(Span::raw(lang.assets.rec_best_rolls))];
                let labels: Vec<String> = (2..=MAX_PLAYERS)
                    .map(|n| fill(lang.assets.rec_players_fmt, &[&n.to_string()]))
                    .collect();
                let label_max = labels.iter().map(|s| s.as_str().width()).max().unwrap_or(0);
                let rolls_w = 5usize; // allow up to 5 digits for roll counts
                for (n, label) in (2..=MAX_PLAYERS).zip(labels.iter()) {
                    // pad so the count column starts 2 spaces after the longest label
                    let mut s = format!("  {}:", label);
                    s.push_str(&" ".repeat(label_max.saturating_sub(label.as_str().width())));
                    s.push_str("  ");
                    match cfg.get_record_detail(n) {
                        Some((rolls, date)) => {
                            s.push_str(&format!("{:>width$}", rolls, width = rolls_w));
                            s.push_str("  ");
                            s.push_str(&lang.format_date(&date));
                        }
                        None => {
                            s.push_str(&format!("{:>width$}", lang.assets.rec_no_record, width = rolls_w));
                        }
                    }
                    rec_lines.push(Spans::from(Span::raw(s)));
                }
                let p = Paragraph::new(Text::from(rec_lines))
                    .block(Block::default().borders(Borders::ALL).title(menu_items[2].1))
                    .alignment(Alignment::Left);
                f.render_widget(p, rb);
                // close button
                let btn_w = lang.assets.btn_close.width() as u16;
                let bx = rb.x + (rb.width.saturating_sub(btn_w)) / 2;
                let by = rb.y + rb.height.saturating_sub(2);
                let btn_rect = Rect::new(bx, by, btn_w, 1);
                ui.modal_close_rect = Some(btn_rect);
                let mut btn_style = Style::default().bg(Color::Gray).fg(Color::Black).add_modifier(Modifier::BOLD);
                if ui.modal_close_pressed { btn_style = Style::default().bg(Color::Green).fg(Color::Black).add_modifier(Modifier::BOLD); }
                else if ui.modal_close_hovered { btn_style = Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD); }
                let btn = Paragraph::new(Spans::from(Span::styled(lang.assets.btn_close, btn_style))).alignment(Alignment::Center).block(Block::default());
                f.render_widget(btn, btn_rect);
            }

            if ui.showing_win {
                if let Some(w) = game.winner {
                    let wb = bottom_centered_block(44, 8, size);
                    ui.modal_rect = Some(wb);
                    f.render_widget(Clear, wb);
                    f.render_widget(Block::default().borders(Borders::ALL).title(lang.assets.win_title), wb);
                    let inner = Rect::new(wb.x + 1, wb.y + 1, wb.width.saturating_sub(2), wb.height.saturating_sub(2));
                    let name = lang.player_name(w, game.players, game.computers);
                    // last_run_new_record is only ever set for human winners
                    let rolls_fmt = if ui.last_run_new_record { lang.assets.win_rolls_record_fmt } else { lang.assets.win_rolls_fmt };
                    let lines = vec![
                        Spans::from(Span::raw("")),
                        Spans::from(Span::raw(fill(lang.assets.win_message_fmt, &[&name]))),
                        Spans::from(Span::raw(fill(rolls_fmt, &[&game.rolls[w].to_string()]))),
                    ];
                    let p = Paragraph::new(Text::from(lines)).alignment(Alignment::Center);
                    f.render_widget(p, inner);
                    // close button
                    let btn_w = lang.assets.btn_close.width() as u16;
                    let bx = inner.x + (inner.width.saturating_sub(btn_w)) / 2;
                    let by = inner.y + inner.height.saturating_sub(1);
                    let btn_rect = Rect::new(bx, by, btn_w, 1);
                    ui.modal_close_rect = Some(btn_rect);
                    let mut btn_style = Style::default().bg(Color::Gray).fg(Color::Black).add_modifier(Modifier::BOLD);
                    if ui.modal_close_pressed { btn_style = Style::default().bg(Color::Green).fg(Color::Black).add_modifier(Modifier::BOLD); }
                    else if ui.modal_close_hovered { btn_style = Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD); }
                    let btn = Paragraph::new(Spans::from(Span::styled(lang.assets.btn_close, btn_style))).alignment(Alignment::Center).block(Block::default());
                    f.render_widget(btn, btn_rect);
                }
            }
        })?;

        // If no modal was rendered this frame, ensure close button state is cleared
        if ui.modal_rect.is_none() {
            ui.modal_close_hovered = false;
            ui.modal_close_pressed = false;
        }

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(KeyEvent { code, kind, .. }) => {
                    if kind == KeyEventKind::Press {
                        if ui.showing_setup {
                            match code {
                                KeyCode::Char(c) if c.is_ascii_digit() => {
                                    match ui.setup_input_mode.unwrap_or(0) {
                                        0 => {
                                            if ui.setup_players_str.is_empty() {
                                                ui.setup_players_str.push(c);
                                            }
                                        }
                                        1 => {
                                            if ui.setup_computers_str.is_empty() {
                                                ui.setup_computers_str.push(c);
                                            }
                                        }
                                        2 => {
                                            if ui.setup_ladders_str.len() < 2 {
                                                ui.setup_ladders_str.push(c);
                                            }
                                        }
                                        _ => {
                                            if ui.setup_snakes_str.len() < 2 {
                                                ui.setup_snakes_str.push(c);
                                            }
                                        }
                                    }
                                    ui.setup_invalid_field = None;
                                }
                                KeyCode::Backspace => {
                                    match ui.setup_input_mode.unwrap_or(0) {
                                        0 => { ui.setup_players_str.pop(); }
                                        1 => { ui.setup_computers_str.pop(); }
                                        2 => { ui.setup_ladders_str.pop(); }
                                        _ => { ui.setup_snakes_str.pop(); }
                                    }
                                    ui.setup_invalid_field = None;
                                }
                                KeyCode::Tab | KeyCode::Down => {
                                    // Move to next field
                                    let cur = ui.setup_input_mode.unwrap_or(0);
                                    ui.setup_input_mode = Some((cur + 1) % 4);
                                    ui.setup_invalid_field = None;
                                }
                                KeyCode::BackTab | KeyCode::Up => {
                                    // Move to previous field
                                    let cur = ui.setup_input_mode.unwrap_or(0);
                                    ui.setup_input_mode = Some(if cur == 0 { 3 } else { cur - 1 });
                                    ui.setup_invalid_field = None;
                                }
                                KeyCode::Enter => {
                                    apply_setup(cfg, &mut game, &mut ui, &mut rng);
                                }
                                KeyCode::Esc => {
                                    ui.showing_setup = false;
                                    ui.setup_input_mode = None;
                                    ui.setup_invalid_field = None;
                                    ui.modal_rect = None;
                                    ui.modal_close_rect = None;
                                    ui.modal_close_pressed = false;
                                }
                                _ => {}
                            }
                        } else if ui.showing_options {
                            match code {
                                KeyCode::Esc => {
                                    ui.showing_options = false;
                                    ui.modal_rect = None;
                                    ui.modal_close_rect = None;
                                    ui.modal_close_pressed = false;
                                    ui.hover_index = None;
                                    ui.options_focus = None;
                                }
                                KeyCode::Enter => {
                                    apply_options(cfg, lang, &mut ui);
                                }
                                KeyCode::Up | KeyCode::Down => {
                                    let focus = ui.options_focus.unwrap_or(0);
                                    ui.options_focus = Some((focus + 1) % 2);
                                }
                                KeyCode::Char(' ') => {
                                    match ui.options_focus.unwrap_or(0) {
                                        0 => ui.options_ascii = !ui.options_ascii,
                                        _ => ui.options_lang = (ui.options_lang + 1) % 2,
                                    }
                                }
                                _ => {}
                            }
                        } else if ui.showing_win {
                            // any key dismisses the result and deals a new board
                            close_win_and_restart(cfg, &mut game, &mut ui, &mut rng);
                        } else if ui.showing_about || ui.showing_help || ui.showing_record {
                            // any key closes these informational modals
                            ui.showing_about = false;
                            ui.showing_help = false;
                            ui.showing_record = false;
                            ui.modal_rect = None;
                            ui.modal_close_rect = None;
                            ui.modal_close_pressed = false;
                            ui.hover_index = None;
                        } else {
                            // normal gameplay key-press handling
                            match code {
                                KeyCode::Esc => { break }
                                KeyCode::F(1) => { ui.showing_help = true }
                                KeyCode::F(2) => {
                                    game = Game::new(cfg.players, cfg.computers, cfg.ladders, cfg.snakes, &mut rng);
                                    reset_ui_after_new_game(&game, &mut ui);
                                }
                                KeyCode::F(4) => { ui.showing_record = true }
                                KeyCode::F(5) => { open_setup(cfg, &mut ui) }
                                KeyCode::F(7) => { open_options(cfg, lang, &mut ui) }
                                KeyCode::F(9) => { ui.showing_about = true }
                                KeyCode::Char(' ') | KeyCode::Enter => {
                                    // humans roll by hand; computer turns fire from the timer below
                                    if !game.over() && !game.is_computer(game.current) {
                                        if let Some(out) = game.roll_and_move(&mut rng) {
                                            present_outcome(out, &game, cfg, &mut ui);
                                        }
                                    }
                                }
                                _ => {}
                            }
                        }
                    }
                }
                Event::Mouse(me) => {
                    // if a modal is open, only respond to mouse events inside it; otherwise handle menu/status
                    if let Some(mrect) = ui.modal_rect {
                        match me.kind {
                            MouseEventKind::Moved => {
                                if !hit(mrect, me.column, me.row) {
                                    // ignore hover outside modal
                                    ui.modal_close_hovered = false;
                                } else {
                                    ui.modal_close_hovered = ui.modal_close_rect.map_or(false, |btn| hit(btn, me.column, me.row));
                                    if ui.showing_options {
                                        if let Some(rect) = ui.options_ascii_rect {
                                            if hit(rect, me.column, me.row) {
                                                ui.options_focus = Some(0);
                                            }
                                        }
                                        if let Some(rect) = ui.options_lang_rect {
                                            if hit(rect, me.column, me.row) {
                                                ui.options_focus = Some(1);
                                            }
                                        }
                                    }
                                }
                            }
                            MouseEventKind::Down(MouseButton::Left) => {
                                if hit(mrect, me.column, me.row) {
                                    // if click hits the OK/CLOSE button rect, mark pressed
                                    if let Some(btn) = ui.modal_close_rect {
                                        if hit(btn, me.column, me.row) {
                                            ui.modal_close_pressed = true;
                                            continue;
                                        }
                                    }
                                    // Options modal click handling
                                    if ui.showing_options {
                                        if let Some(rect) = ui.options_ascii_rect {
                                            if hit(rect, me.column, me.row) {
                                                ui.options_ascii = !ui.options_ascii;
                                                ui.options_focus = Some(0);
                                                continue;
                                            }
                                        }
                                        if let Some(rect) = ui.options_lang_rect {
                                            if hit(rect, me.column, me.row) {
                                                ui.options_lang = (ui.options_lang + 1) % 2;
                                                ui.options_focus = Some(1);
                                                continue;
                                            }
                                        }
                                    }
                                    // Setup modal: clicking a field focuses it
                                    if ui.showing_setup {
                                        for idx in 0..4 {
                                            if let Some(rect) = ui.setup_rects[idx] {
                                                if hit(rect, me.column, me.row) {
                                                    ui.setup_input_mode = Some(idx as u8);
                                                    break;
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                            MouseEventKind::Up(_) => {
                                // if we had pressed the OK/CLOSE button, check release inside button
                                if ui.modal_close_pressed {
                                    if let Some(btn) = ui.modal_close_rect {
                                        if hit(btn, me.column, me.row) {
                                            if ui.showing_setup {
                                                // OK button acts like pressing Enter
                                                apply_setup(cfg, &mut game, &mut ui, &mut rng);
                                            } else if ui.showing_options {
                                                apply_options(cfg, lang, &mut ui);
                                            } else if ui.showing_win {
                                                close_win_and_restart(cfg, &mut game, &mut ui, &mut rng);
                                            } else {
                                                ui.showing_about = false;
                                                ui.showing_help = false;
                                                ui.showing_record = false;
                                                // clear modal geometry so following mouse events reach the main UI
                                                ui.modal_rect = None;
                                                ui.modal_close_rect = None;
                                                ui.hover_index = None;
                                            }
                                        }
                                    }
                                    ui.modal_close_pressed = false;
                                }
                            }
                            MouseEventKind::Down(MouseButton::Right) => {
                                // Right-click anywhere in a modal closes it (like Esc)
                                if ui.showing_win {
                                    close_win_and_restart(cfg, &mut game, &mut ui, &mut rng);
                                } else {
                                    ui.showing_setup = false;
                                    ui.setup_input_mode = None;
                                    ui.showing_options = false;
                                    ui.showing_about = false;
                                    ui.showing_help = false;
                                    ui.showing_record = false;
                                    ui.modal_rect = None;
                                    ui.modal_close_rect = None;
                                    ui.modal_close_pressed = false;
                                    ui.hover_index = None;
                                }
                            }
                            _ => {}
                        }
                    } else {
                        // no modal: decide whether the mouse targets the menu or the status row
                        let menu_handled = if let Some(rect) = menu_rect {
                            let start_x = rect.x + 2; // account for one-space left padding inside menu
                            let y = rect.y + 1;
                            if me.row == y {
                                match me.kind {
                                    MouseEventKind::Moved => {
                                        let mut offset = start_x;
                                        let mut found: Option<usize> = None;
                                        for (i, (k, r)) in menu_items.iter().take(6).enumerate() {
                                            if i > 0 { offset += 3; }
                                            // account for the ": " we add when rendering (use display width)
                                            let full_len = (k.width() + 2 + r.width()) as u16;
                                            let end = offset + full_len - 1;
                                            if me.column >= offset && me.column <= end {
                                                found = Some(i);
                                                break;
                                            }
                                            offset = end + 1;
                                        }
                                        ui.hover_index = found;
                                        true
                                    }
                                    MouseEventKind::Down(MouseButton::Left) => {
                                        let mut consumed = false;
                                        let mut offset = start_x;
                                        for (i, (k, r)) in menu_items.iter().take(6).enumerate() {
                                            if i > 0 { offset += 3; }
                                            let full_len = (k.width() + 2 + r.width()) as u16;
                                            let end = offset + full_len - 1;
                                            if me.column >= offset && me.column <= end {
                                                ui.clicked_index = Some(i);
                                                ui.click_instant = Some(Instant::now());
                                                match i {
                                                    0 => ui.showing_help = true,
                                                    1 => {
                                                        game = Game::new(cfg.players, cfg.computers, cfg.ladders, cfg.snakes, &mut rng);
                                                        reset_ui_after_new_game(&game, &mut ui);
                                                    }
                                                    2 => ui.showing_record = true,
                                                    3 => open_setup(cfg, &mut ui),
                                                    4 => open_options(cfg, lang, &mut ui),
                                                    5 => ui.showing_about = true,
                                                    _ => {}
                                                }
                                                consumed = true;
                                                break;
                                            }
                                            offset = end + 1;
                                        }
                                        consumed
                                    }
                                    MouseEventKind::Up(_) => {
                                        // Consume all Up events on menu row
                                        true
                                    }
                                    _ => false,
                                }
                            } else {
                                // mouse not on menu row -> clear hover
                                if let MouseEventKind::Moved = me.kind { ui.hover_index = None; }
                                false
                            }
                        } else { false };

                        if !menu_handled {
                            // handle status bar Esc: Exit mouse interactions (right-aligned label)
                            if let Some(srect) = status_rect {
                                let status_row = srect.y + 1;
                                if me.row == status_row {
                                    // compute positions matching rendering logic
                                    let left_text = status_left_text(&game, &ui, lang);
                                    let esc = menu_items[6];
                                    let inner_w = srect.width.saturating_sub(2) as usize;
                                    let left_w = left_text.as_str().width();
                                    let right_w = esc.0.width() + 2 + esc.1.width();
                                    let mid_spaces = if inner_w > left_w + right_w + 1 { inner_w - left_w - right_w - 1 } else { 1 };
                                    let start_x = srect.x + 1 + left_w as u16 + mid_spaces as u16;
                                    let end_x = start_x + (right_w as u16).saturating_sub(1);
                                    match me.kind {
                                        MouseEventKind::Moved => {
                                            ui.exit_status_hovered = me.column >= start_x && me.column <= end_x;
                                        }
                                        MouseEventKind::Down(MouseButton::Left) => {
                                            if me.column >= start_x && me.column <= end_x {
                                                ui.exit_menu_item_down = true;
                                            }
                                        }
                                        MouseEventKind::Up(MouseButton::Left) => {
                                            if ui.exit_menu_item_down {
                                                ui.exit_menu_item_down = false;
                                                if me.column >= start_x && me.column <= end_x {
                                                    exit_requested = true;
                                                }
                                            }
                                        }
                                        _ => {}
                                    }
                                } else {
                                    ui.exit_status_hovered = false;
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
            if exit_requested { break; }
        }

        // fire a due computer turn once no modal is covering the board
        let modal_open = ui.showing_setup || ui.showing_help || ui.showing_record
            || ui.showing_options || ui.showing_about || ui.showing_win;
        if !modal_open && !game.over() {
            if let Some(due) = ui.auto_due {
                if Instant::now() >= due {
                    ui.auto_due = None;
                    if game.is_computer(game.current) {
                        if let Some(out) = game.roll_and_move(&mut rng) {
                            present_outcome(out, &game, cfg, &mut ui);
                        }
                    }
                }
            }
        }

        // clear click feedback after short duration
        if let Some(t0) = ui.click_instant {
            if t0.elapsed() > Duration::from_millis(200) {
                ui.clicked_index = None;
                ui.click_instant = None;
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    // Save current table setup before exiting
    save_config(cfg);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn centered_block(w: u16, h: u16, r: Rect) -> Rect { center_rect(w, h, r) }

fn bottom_centered_block(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + r.height.saturating_sub(height);
    Rect::new(x, y, width, height)
}
