use treehuff::{compress_bytes, decompress_bytes, CodeTable, CodeTree, FrequencyTable};

fn main() -> Result<(), treehuff::HuffError> {
    let s = String::from("Hello my name is Sam!");

    let freq = FrequencyTable::from_bytes(s.as_bytes());
    let table = CodeTable::from_tree(&CodeTree::build(&freq));
    for (symbol, code) in table.iter() {
        println!("{symbol:>3} {}", treehuff::code::code_string(code));
    }

    let packed = compress_bytes(s.as_bytes())?;
    let dec = String::from_utf8(decompress_bytes(&packed)?);

    println!("{} bytes -> {} bytes: {:?}", s.len(), packed.len(), dec);
    Ok(())
}
