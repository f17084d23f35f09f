//! Plain-text transcript export.

use chrono::{NaiveDate, NaiveDateTime};
use tutor_types::message::Message;
use tutor_types::session::SavedChat;

const RULE: &str = "═══════════════════════════════════════";
const PLATFORM_TITLE: &str = "       المنصة التعليمية الذكية";
const ALL_CHATS_TITLE: &str = "    جميع المحادثات المحفوظة";
const IMAGE_MARKER: &str = "[صورة مرفقة]";
const BLOCK_SEPARATOR: &str = "\n---\n\n";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn export_chat_as_text(messages: &[Message], exported_at: NaiveDateTime) -> String {
    let mut text = banner(PLATFORM_TITLE);

    let blocks: Vec<String> = messages.iter().map(message_block).collect();
    text.push_str(&blocks.join(BLOCK_SEPARATOR));

    text.push('\n');
    text.push_str(RULE);
    text.push('\n');
    text.push_str(&format!("تاريخ التصدير: {}\n", exported_at.format(TIMESTAMP_FORMAT)));
    text.push_str(RULE);
    text.push('\n');
    text
}

pub fn export_all_chats_as_text(chats: &[SavedChat], exported_at: NaiveDateTime) -> String {
    let mut text = banner(ALL_CHATS_TITLE);
    for (index, chat) in chats.iter().enumerate() {
        text.push_str(&format!("\n📝 محادثة {}: {}\n", index + 1, chat.title));
        text.push_str(&format!("📅 التاريخ: {}\n", chat.date_label()));
        text.push_str(&format!("💬 عدد الرسائل: {}\n\n", chat.messages.len()));
        text.push_str(&export_chat_as_text(&chat.messages, exported_at));
        text.push_str("\n\n");
    }
    text
}

pub fn transcript_filename(date: NaiveDate) -> String {
    format!("محادثة_{}.txt", date.format("%Y-%m-%d"))
}

pub fn all_chats_filename(date: NaiveDate) -> String {
    format!("جميع_المحادثات_{}.txt", date.format("%Y-%m-%d"))
}

fn banner(title: &str) -> String {
    format!("{RULE}\n{title}\n{RULE}\n\n")
}

fn message_block(msg: &Message) -> String {
    let mut block = format!("{}:\n{}\n", msg.sender.label(), msg.text);
    if msg.image_preview.is_some() {
        block.push_str(IMAGE_MARKER);
        block.push('\n');
    }
    block
}
