use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let wordlist_txt_path = "profanity_wordlist.txt";
    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("profanity.fst");

    println!("cargo:rerun-if-changed={}", wordlist_txt_path);

    let reader = BufReader::new(File::open(wordlist_txt_path)?);
    let mut terms: Vec<String> = reader
        .lines()
        .map(|line| Ok(line?.trim().to_lowercase()))
        .collect::<io::Result<Vec<_>>>()?
        .into_iter()
        .filter(|term| !term.is_empty() && !term.starts_with('#'))
        .collect();

    // fst 要求按字典序插入且不能重复
    terms.sort_unstable();
    terms.dedup();

    let mut writer = BufWriter::new(File::create(&dest_path)?);
    let mut build = fst::SetBuilder::new(&mut writer)?;
    build.extend_iter(terms.iter())?;
    build.finish()?;

    Ok(())
}
