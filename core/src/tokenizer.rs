use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            // Indonesian
            "dan","atau","tetapi","tapi","namun","sedangkan","melainkan","padahal","jika","bila",
            "kalau","supaya","agar","untuk","guna","bagi","demi","karena","sebab","maka",
            "sehingga","sampai","hingga","yang","ini","itu","pada","di","ke","dari",
            "oleh","dengan","secara","menurut","antara","adalah","ialah","merupakan","yaitu",
            "yakni","seperti","bagai","bagaikan","laksana","bak","tentang","mengenai","terhadap",
            "akan","sedang","telah","sudah","belum","bisa","dapat","harus","wajib","mesti",
            "boleh","mungkin","barangkali","pasti","tentu","tidak","bukan","jangan","sekali",
            "sangat","amat","paling","lebih","kurang","cukup","terlalu","hanya","cuma","saja",
            "lagi","pun","juga","kan","lah","kah","tah","ada","tiada","saya","aku",
            "kita","kami","anda","kamu","dia","mereka","apa","siapa","kapan","dimana",
            "mengapa","bagaimana","berapa",
            // English
            "and","or","but","if","then","else","when","at","from","by","for","with",
            "about","against","between","into","through","during","before","after","above",
            "below","to","of","in","on","off","over","under","again","further",
            "once","here","there","where","why","how","all","any","both","each","few",
            "more","most","other","some","such","no","nor","not","only","own","same",
            "so","than","too","very","can","will","just","should","now","is","are","was",
            "were","be","been","being","have","has","had","do","does","did","a","an","the",
        ];
        words.iter().copied().collect()
    };
}

/// Prefixes are tried in this order and at most one is removed.
const PREFIXES: &[&str] = &["meng", "men", "mem", "me", "peng", "pen", "pem", "di", "ter", "ber"];

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Heuristic Indonesian affix stripper: one prefix, then one suffix.
/// Words of three characters or fewer are returned unchanged.
pub fn stem(word: &str) -> String {
    if word.chars().count() <= 3 {
        return word.to_string();
    }
    let mut res = word;
    if let Some(prefix) = PREFIXES.iter().find(|p| res.starts_with(**p)) {
        res = &res[prefix.len()..];
    }
    // Suffix guards compare against the length before the suffix is removed.
    let len = res.chars().count();
    if res.ends_with("kan") && len > 5 {
        res = &res[..res.len() - 3];
    } else if res.ends_with("an") && len > 4 {
        res = &res[..res.len() - 2];
    } else if res.ends_with('i') && len > 4 {
        res = &res[..res.len() - 1];
    }
    res.to_string()
}

/// Tokenizer for the ranking and clustering methods: NFKC + lowercase, word
/// runs, stopword and single-character removal, then [`stem`].
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    WORD.find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|token| !is_stopword(token) && token.chars().count() > 1)
        .map(stem)
        .collect()
}

/// Literal tokenizer for boolean retrieval: lowercase word runs, nothing removed
/// and nothing stemmed.
pub fn tokenize_raw(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Pembangunan rumah di desa");
        assert_eq!(t, vec!["bangun", "rumah", "desa"]);
    }

    #[test]
    fn short_words_are_not_stemmed() {
        assert_eq!(stem("mem"), "mem");
        assert_eq!(stem("dia"), "dia");
    }

    #[test]
    fn only_one_prefix_is_removed() {
        // "meng" wins over "me", and "ber" is not tried afterwards.
        assert_eq!(stem("mengber"), "ber");
        assert_eq!(stem("bermain"), "main");
        assert_eq!(stem("terbaca"), "baca");
    }

    #[test]
    fn suffix_guards() {
        assert_eq!(stem("makanan"), "makan");
        assert_eq!(stem("diberikan"), "beri");
        assert_eq!(stem("mendapati"), "dapat");
        // too short for "kan": falls through to "an"
        assert_eq!(stem("makan"), "mak");
        // too short for "an"
        assert_eq!(stem("ikan"), "ikan");
    }

    #[test]
    fn raw_tokenizer_keeps_everything() {
        let t = tokenize_raw("The cat AND a dog_2");
        assert_eq!(t, vec!["the", "cat", "and", "a", "dog_2"]);
    }
}
