//! 脏词词表。
//!
//! 内置的基础词表在构建时由 `build.rs` 编译为一个 `fst` 集合并嵌入二进制，
//! 再与宿主进程提供的自定义词表合并。`ProfanityFilter` 构建完成后不可变，
//! 可以在多个线程之间共享引用。

use std::collections::HashSet;
use std::path::Path;

use fst::{Automaton, IntoStreamer, Set, Streamer};
use tracing::info;

use crate::{
    config::{CUSTOM_WORDS_FILE_NAME, get_config_file_path, load_custom_terms},
    error::Result,
    matching::normalizer::normalize_word,
};

/// 构建时生成的基础词表
static BASE_WORDLIST_FST: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/profanity.fst"));

/// 打码符号，匹配任意一个字符
const WILDCARD: char = '*';

/// 通配匹配时要求的最少明文字符数，避免 "**" 这类纯符号匹配到短词
const MIN_LITERAL_CHARS: usize = 2;

/// 常见的数字/符号替代写法
fn fold_leetspeak(c: char) -> char {
    match c {
        '@' | '4' => 'a',
        '3' => 'e',
        '1' | '!' => 'i',
        '0' => 'o',
        '$' | '5' => 's',
        '7' => 't',
        other => other,
    }
}

/// 在 fst 上逐字节进行通配匹配的自动机，`*` 匹配任意一个字节。
struct WildcardAutomaton<'a> {
    pattern: &'a [u8],
}

impl Automaton for WildcardAutomaton<'_> {
    type State = Option<usize>;

    fn start(&self) -> Self::State {
        Some(0)
    }

    fn is_match(&self, state: &Self::State) -> bool {
        *state == Some(self.pattern.len())
    }

    fn can_match(&self, state: &Self::State) -> bool {
        state.is_some()
    }

    fn accept(&self, state: &Self::State, byte: u8) -> Self::State {
        let pos = (*state)?;
        let expected = *self.pattern.get(pos)?;
        (expected == b'*' || expected == byte).then_some(pos + 1)
    }
}

/// 按字符比较通配模式和词条
fn wildcard_matches(pattern: &str, term: &str) -> bool {
    pattern.chars().count() == term.chars().count()
        && pattern
            .chars()
            .zip(term.chars())
            .all(|(p, t)| p == WILDCARD || p == t)
}

/// 脏词检测服务。
#[derive(Debug, Clone)]
pub struct ProfanityFilter {
    base: Set<&'static [u8]>,
    custom: HashSet<String>,
}

impl ProfanityFilter {
    /// 只使用内置词表创建检测器。
    pub fn new() -> Result<Self> {
        Ok(Self {
            base: Set::new(BASE_WORDLIST_FST)?,
            custom: HashSet::new(),
        })
    }

    /// 创建检测器并合并自定义词条，词条会被转为小写。
    pub fn with_custom_terms<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::new()?;
        filter.custom = terms
            .into_iter()
            .map(|term| term.as_ref().trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        Ok(filter)
    }

    /// 从指定的自定义词表文件创建检测器，文件不存在时只使用内置词表。
    pub fn from_custom_file(path: &Path) -> Result<Self> {
        Self::with_custom_terms(load_custom_terms(path)?)
    }

    /// 从用户配置目录中的自定义词表创建检测器。
    pub fn from_config_dir() -> Result<Self> {
        let path = get_config_file_path(CUSTOM_WORDS_FILE_NAME)?;
        let filter = Self::from_custom_file(&path)?;
        info!(
            "[ProfanityFilter] 词表就绪: 内置 {} 个, 自定义 {} 个。",
            filter.base.len(),
            filter.custom.len()
        );
        Ok(filter)
    }

    /// 内置词条数量。
    #[must_use]
    pub fn base_term_count(&self) -> usize {
        self.base.len()
    }

    /// 自定义词条数量。
    #[must_use]
    pub fn custom_term_count(&self) -> usize {
        self.custom.len()
    }

    /// 词条（忽略大小写）是否在词表中。
    #[must_use]
    pub fn contains_term(&self, term: &str) -> bool {
        let lowered = term.to_lowercase();
        self.base.contains(&lowered) || self.custom.contains(&lowered)
    }

    /// 单个规范化变体是否命中词表。
    ///
    /// 依次尝试：原样匹配、还原数字/符号替代写法后匹配、把 `*` 当作任意字符的通配匹配。
    #[must_use]
    pub fn matches_variant(&self, variant: &str) -> bool {
        let lowered = variant.to_lowercase();
        if self.contains_term(&lowered) {
            return true;
        }

        let folded: String = lowered.chars().map(fold_leetspeak).collect();
        if folded != lowered && self.contains_term(&folded) {
            return true;
        }

        self.matches_wildcard(&lowered)
    }

    /// 单词的任一规范化变体命中词表即视为脏词。
    #[must_use]
    pub fn is_profane(&self, word: &str) -> bool {
        normalize_word(word)
            .iter()
            .any(|variant| self.matches_variant(variant))
    }

    fn matches_wildcard(&self, pattern: &str) -> bool {
        if !pattern.contains(WILDCARD) {
            return false;
        }
        let literal_chars = pattern.chars().filter(|c| *c != WILDCARD).count();
        if literal_chars < MIN_LITERAL_CHARS {
            return false;
        }

        if self.custom.iter().any(|term| wildcard_matches(pattern, term)) {
            return true;
        }

        // 内置词表全部是 ASCII，按字节通配即可
        if !pattern.is_ascii() {
            return false;
        }
        let automaton = WildcardAutomaton {
            pattern: pattern.as_bytes(),
        };
        let mut stream = self.base.search(automaton).into_stream();
        stream.next().is_some()
    }
}
