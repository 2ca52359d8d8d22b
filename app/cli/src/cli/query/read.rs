use std::str::FromStr;

use clap::ValueEnum;

#[derive(Debug, Clone, ValueEnum)]
pub enum Entity {
    Purchase,
    RawLog,
    Cursor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FromBlock {
    Number(u64),
    Last,
}

impl FromStr for FromBlock {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("last") {
            Ok(FromBlock::Last)
        } else {
            s.parse::<u64>()
                .map(FromBlock::Number)
                .map_err(|_| format!("`{s}` is not a valid block number or `last`"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_block() {
        assert_eq!("42".parse::<FromBlock>(), Ok(FromBlock::Number(42)));
        assert_eq!("LAST".parse::<FromBlock>(), Ok(FromBlock::Last));
        assert!("-1".parse::<FromBlock>().is_err());
        assert!("tip".parse::<FromBlock>().is_err());
    }
}
