pub mod context;

/// A notification template exercising every kind of directive.
pub const TEMPLATE: &str = "\
%[% ping %|%
    Hey %[user]%!
%]%
Welcome to %[channel!u]%, %[%!nsfw%|%enjoy your stay.%|%you must be 18+.%]%
{\"topic\": \"%[topic!j]%\"} 100%%
%[footer]%";

/// Repeats the template source `n` times.
pub fn repeat(source: &str, n: usize) -> String {
    let mut s = String::with_capacity(source.len() * n);
    for _ in 0..n {
        s.push_str(source);
        s.push('\n');
    }
    s
}
