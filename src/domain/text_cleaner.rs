//! 文本清洗器
//!
//! 把幻灯片里提取出的原始文本整理成适合语音合成的句子。
//! 纯函数，对任意输入都产生输出，不会让流水线失败。

/// 检查是否为句末标点（之后需要补一个空格）
#[inline]
fn is_sentence_punct(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// 在每个句末标点后面补一个空格
///
/// 幻灯片文本的句子之间往往没有空格（"one.two"），
/// 补空格后合成器才会在句间停顿。
fn space_after_sentence_punct(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);

    for ch in text.chars() {
        out.push(ch);
        if is_sentence_punct(ch) {
            out.push(' ');
        }
    }

    out
}

/// 把连续空白字符折叠为单个空格
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }

    out
}

/// 首字母大写，其余小写
fn capitalize(piece: &str) -> String {
    let mut chars = piece.chars();

    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// 清洗文本
///
/// 清洗步骤：
/// 1. 每个 `.` `!` `?` 后补一个空格
/// 2. 连续空白折叠为单个空格
/// 3. 按 `". "` 切分，每段首字母大写（末段没有结尾分隔符，同样大写）
///
/// 空输入产生空输出。
pub fn clean_text(input: &str) -> String {
    let spaced = space_after_sentence_punct(input);
    let collapsed = collapse_whitespace(&spaced);

    collapsed
        .split(". ")
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(". ")
}
