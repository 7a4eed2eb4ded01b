//! Embedded sentiment resources: the valence lexicon and the modifier tables.
//!
//! Valences use the conventional -4..=4 scale. The table is curated for
//! discussion-forum text, so it carries internet shorthand (lol, wtf, meh)
//! alongside ordinary sentiment vocabulary. Degree modifiers and negations
//! live in their own tables and must not also appear as lexicon entries;
//! a token found in the lexicon is never treated as a modifier.

use ahash::AHashMap;
use anyhow::{bail, ensure, Result};

/// Empirically derived increment for degree modifiers ("very", "extremely").
pub(crate) const BOOST_INCR: f64 = 0.293;
/// Decrement for dampening modifiers ("barely", "kinda").
pub(crate) const BOOST_DECR: f64 = -0.293;

/// Scalar applied to a valence preceded by a negation within three tokens.
pub(crate) const NEGATION_SCALAR: f64 = -0.74;

/// Emphasis added to an ALL-CAPS sentiment word when the text mixes cases.
pub(crate) const CAPS_EMPHASIS: f64 = 0.733;

/// Normalization constant: compound = sum / sqrt(sum^2 + alpha).
pub(crate) const NORMALIZE_ALPHA: f64 = 15.0;

/// Degree modifiers and their intensity adjustment, applied with distance
/// decay to the following sentiment word.
pub(crate) const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOST_INCR),
    ("amazingly", BOOST_INCR),
    ("awfully", BOOST_INCR),
    ("completely", BOOST_INCR),
    ("considerably", BOOST_INCR),
    ("decidedly", BOOST_INCR),
    ("deeply", BOOST_INCR),
    ("enormously", BOOST_INCR),
    ("entirely", BOOST_INCR),
    ("especially", BOOST_INCR),
    ("exceptionally", BOOST_INCR),
    ("extremely", BOOST_INCR),
    ("fabulously", BOOST_INCR),
    ("flipping", BOOST_INCR),
    ("flippin", BOOST_INCR),
    ("fricking", BOOST_INCR),
    ("frickin", BOOST_INCR),
    ("frigging", BOOST_INCR),
    ("friggin", BOOST_INCR),
    ("fully", BOOST_INCR),
    ("fucking", BOOST_INCR),
    ("greatly", BOOST_INCR),
    ("hella", BOOST_INCR),
    ("highly", BOOST_INCR),
    ("hugely", BOOST_INCR),
    ("incredibly", BOOST_INCR),
    ("intensely", BOOST_INCR),
    ("majorly", BOOST_INCR),
    ("more", BOOST_INCR),
    ("most", BOOST_INCR),
    ("particularly", BOOST_INCR),
    ("purely", BOOST_INCR),
    ("quite", BOOST_INCR),
    ("really", BOOST_INCR),
    ("remarkably", BOOST_INCR),
    ("so", BOOST_INCR),
    ("substantially", BOOST_INCR),
    ("thoroughly", BOOST_INCR),
    ("totally", BOOST_INCR),
    ("tremendously", BOOST_INCR),
    ("uber", BOOST_INCR),
    ("unbelievably", BOOST_INCR),
    ("unusually", BOOST_INCR),
    ("utterly", BOOST_INCR),
    ("very", BOOST_INCR),
    ("almost", BOOST_DECR),
    ("barely", BOOST_DECR),
    ("hardly", BOOST_DECR),
    ("kinda", BOOST_DECR),
    ("kindof", BOOST_DECR),
    ("less", BOOST_DECR),
    ("little", BOOST_DECR),
    ("marginally", BOOST_DECR),
    ("occasionally", BOOST_DECR),
    ("partly", BOOST_DECR),
    ("scarcely", BOOST_DECR),
    ("slightly", BOOST_DECR),
    ("somewhat", BOOST_DECR),
    ("sorta", BOOST_DECR),
    ("sortof", BOOST_DECR),
];

/// Negation cues, with and without apostrophes (the scorer keeps them).
pub(crate) const NEGATIONS: &[&str] = &[
    "aint", "ain't", "arent", "aren't", "cannot", "cant", "can't", "couldnt", "couldn't",
    "darent", "daren't", "didnt", "didn't", "doesnt", "doesn't", "dont", "don't", "hadnt",
    "hadn't", "hasnt", "hasn't", "havent", "haven't", "isnt", "isn't", "mightnt", "mightn't",
    "mustnt", "mustn't", "neither", "never", "none", "nope", "nor", "not", "nothing", "nowhere",
    "oughtnt", "oughtn't", "rarely", "seldom", "shant", "shan't", "shouldnt", "shouldn't",
    "wasnt", "wasn't", "werent", "weren't", "without", "wont", "won't", "wouldnt", "wouldn't",
];

/// One `token valence` pair per line, whitespace separated. Parsed and
/// validated by `parse_lexicon` at analyzer construction.
pub(crate) const RAW_LEXICON: &str = "
abandon -1.9
abandoned -2.0
abuse -3.2
abusive -3.2
accident -2.1
ache -1.9
admire 2.1
adorable 2.2
adore 2.9
advantage 1.5
aggressive -1.4
agony -3.1
agree 1.5
agreeable 1.8
alarm -1.4
alone -1.0
amazing 2.8
amusing 1.7
anger -2.7
angry -2.3
annoy -1.9
annoyed -1.8
annoying -1.9
anxious -1.9
apathy -1.2
appalling -2.9
appreciate 1.9
appreciated 2.0
argue -1.5
argument -1.6
arrogant -2.1
ashamed -2.1
atrocious -3.0
attack -2.1
awesome 3.1
awful -2.0
awkward -1.1
bad -2.5
badly -2.2
beautiful 2.9
beautifully 2.7
benefit 1.6
best 3.2
betray -3.0
betrayed -2.8
better 1.9
bitter -1.8
bland -0.9
bless 1.8
blessed 2.3
bliss 2.9
bold 1.2
bore -1.3
bored -1.3
boring -1.3
brave 2.2
brilliant 2.8
broke -1.4
broken -1.9
brutal -2.6
bullshit -2.8
bully -2.6
calm 1.3
careless -1.4
catastrophe -3.0
celebrate 2.4
champion 2.4
chaos -2.0
charming 2.1
cheap -0.8
cheat -2.6
cheated -2.7
cheer 2.3
cheerful 2.5
clever 2.0
comfort 1.7
comfortable 1.8
complain -1.6
complained -1.5
compliment 1.8
confident 2.0
confused -1.2
confusing -1.3
congrats 2.4
congratulations 2.7
cool 1.3
corrupt -2.9
coward -2.0
crap -2.0
crappy -2.4
crash -1.7
crazy -1.4
creative 1.9
creepy -1.9
cried -1.9
cringe -1.6
cruel -2.8
cry -1.9
crying -2.0
cute 2.0
cynical -1.6
damage -1.8
damn -1.6
danger -2.2
dangerous -2.1
dead -3.0
deceive -2.4
decent 1.4
defeat -1.6
defeated -2.0
defect -1.7
delight 2.6
delighted 2.7
delightful 2.8
denied -1.5
depress -2.2
depressed -2.3
depressing -2.3
desperate -1.9
destroy -2.4
destroyed -2.5
devastated -3.1
devastating -3.0
died -2.9
dirty -1.5
disagree -1.5
disappoint -2.2
disappointed -2.2
disappointing -2.3
disappointment -2.4
disaster -3.1
disastrous -3.0
disgrace -2.4
disgust -2.9
disgusted -2.8
disgusting -2.9
dishonest -2.5
dislike -1.6
dismal -2.4
disrespect -2.1
doom -2.2
doubt -1.4
dread -2.4
dreadful -2.9
dream 1.4
dull -1.5
dumb -2.3
dying -3.0
eager 1.7
easy 1.3
ecstatic 3.1
effective 1.7
efficient 1.8
elegant 2.1
embarrassed -1.7
embarrassing -1.8
emergency -2.2
empty -1.2
encourage 1.9
enemies -1.9
enemy -2.1
energetic 1.9
engaging 1.8
enjoy 2.2
enjoyable 2.2
enjoyed 2.3
entertaining 1.9
enthusiastic 2.2
envy -1.3
epic 2.5
error -1.6
evil -3.4
excellent 2.7
excited 2.4
excitement 2.4
exciting 2.4
excruciating -3.3
exhausted -1.7
extraordinary 2.5
fabulous 2.8
fail -2.3
failed -2.3
failure -2.5
fair 1.4
faith 1.8
fake -1.9
fantastic 2.6
fascinating 2.4
fatigue -1.4
fault -1.6
favorite 2.3
fear -2.2
feared -2.0
fearless 1.9
fiasco -2.5
filthy -2.1
fine 1.1
flawless 2.7
flop -1.8
fool -1.9
foolish -1.9
forgive 1.6
fortunate 2.1
fraud -2.8
free 1.6
freedom 2.2
fresh 1.3
friendly 2.1
frightened -2.1
frustrated -2.1
frustrating -2.2
frustration -2.2
fuck -2.5
fucked -2.6
fun 2.3
funny 1.9
furious -2.7
garbage -2.2
generous 2.3
genius 2.7
gentle 1.8
glad 2.0
gloomy -1.9
glorious 2.8
good 1.9
gorgeous 2.7
grace 1.9
graceful 2.1
grateful 2.3
gratitude 2.1
great 3.1
greatest 3.2
greed -2.2
greedy -2.3
grief -2.7
grim -2.0
gross -2.1
guilt -2.0
guilty -2.0
happiness 2.7
happy 2.7
harm -2.2
harmful -2.3
harsh -1.9
hate -2.7
hated -2.9
hateful -3.0
hates -2.4
hatred -3.2
heartbreaking -2.8
heartbroken -2.9
heaven 2.3
hell -2.6
hellish -3.0
helpful 1.8
helpless -1.9
hero 2.6
hilarious 2.5
honest 2.2
honor 2.3
hope 1.9
hopeful 2.0
hopeless -2.4
horrendous -3.0
horrible -2.5
horrific -3.1
horror -2.9
hostile -2.3
humiliated -2.5
humiliating -2.6
hurt -2.3
hurts -2.0
ideal 2.2
idiot -2.6
idiotic -2.7
ignorant -2.0
ignore -1.3
ignored -1.5
immoral -2.3
impress 2.0
impressed 2.2
impressive 2.3
improve 1.8
improved 1.9
improvement 1.8
inadequate -1.8
incompetent -2.4
incredible 2.8
infuriating -2.7
innovative 2.0
insane -1.7
inspire 2.2
inspired 2.3
inspiring 2.4
insult -2.3
insulted -2.4
insulting -2.4
intelligent 2.3
interesting 1.7
intriguing 1.9
irritated -1.9
irritating -2.0
jealous -1.8
jerk -2.2
joy 2.8
joyful 2.9
kindness 2.3
lame -1.7
laugh 2.2
laughed 2.0
laughing 2.2
lazy -1.6
liar -2.6
lie -2.1
lied -2.3
lies -2.1
like 1.5
liked 1.8
likes 1.6
lmao 2.0
lol 1.6
lonely -1.9
lose -1.9
loser -2.4
losing -1.8
loss -1.9
lost -1.4
love 3.2
loved 2.9
lovely 2.8
loves 2.7
loving 2.9
loyal 2.1
luck 1.8
lucky 2.0
ludicrous -1.8
mad -2.2
magnificent 2.9
marvelous 2.8
masterpiece 3.0
mediocre -1.3
meh -0.8
mess -1.6
messy -1.4
miracle 2.6
miserable -2.7
misery -2.9
mistake -1.7
mistakes -1.8
mock -1.8
moron -2.6
motivated 1.9
mourn -2.4
murder -3.4
murdered -3.3
nasty -2.5
neat 1.7
neglect -1.9
nervous -1.5
nice 1.8
nicely 1.9
nightmare -2.8
noble 2.0
nonsense -1.8
notorious -1.9
numb -1.4
obnoxious -2.3
offend -2.0
offended -2.1
offensive -2.2
optimistic 2.1
outrage -2.6
outraged -2.7
outrageous -2.4
outstanding 2.8
pain -2.4
painful -2.5
panic -2.4
paradise 2.8
pathetic -2.5
peace 2.2
peaceful 2.3
perfect 2.7
perfection 2.9
perfectly 2.6
pessimistic -1.8
petty -1.6
phenomenal 2.9
pity -1.3
pleasant 2.1
pleased 2.2
pleasure 2.5
poison -2.5
poor -2.1
powerful 1.9
praise 2.4
precious 2.3
pretty 2.2
pride 1.9
problem -1.6
problems -1.7
promising 2.0
protect 1.8
proud 2.3
punish -2.1
pure 1.7
quality 1.5
quit -1.4
rage -2.9
reject -1.9
rejected -2.1
relax 1.9
relaxed 2.0
relief 1.9
relieved 2.1
remarkable 2.4
rescue 1.9
resent -2.0
respect 2.1
respected 2.2
revenge -2.4
reward 2.0
rich 1.9
ridiculous -1.6
risk -1.1
rotten -2.5
rude -2.2
ruin -2.4
ruined -2.5
sad -2.1
sadly -2.0
sadness -2.4
safe 1.8
satisfied 2.0
satisfying 2.1
save 1.9
scam -2.7
scandal -2.3
scare -2.0
scared -2.1
scary -2.2
scream -1.9
screwed -2.2
selfish -2.2
sensational 2.5
shame -2.1
shameful -2.5
shit -2.6
shitty -2.8
shock -1.9
shocked -1.9
shocking -2.0
sick -1.9
silly -1.1
sincere 2.0
skeptical -1.4
smart 2.1
smile 2.1
smooth 1.5
solid 1.6
sorrow -2.5
sorry -1.0
spam -1.8
spectacular 2.9
splendid 2.7
stale -1.1
stellar 2.6
stink -1.9
strange -0.9
stress -2.0
stressed -2.0
stressful -2.2
strong 1.7
struggle -1.8
struggling -1.9
stunning 2.7
stupid -2.4
stupidity -2.6
succeed 2.1
success 2.4
successful 2.4
suck -2.2
sucked -2.3
sucks -2.3
suffer -2.4
suffering -2.5
suicide -3.3
super 2.1
superb 2.9
superior 1.9
support 1.7
supportive 2.0
sweet 2.0
sympathy 1.3
talent 2.0
talented 2.2
tears -1.6
terrible -2.1
terribly -2.3
terrific 2.7
terrified -2.7
terror -3.0
thank 1.9
thanks 1.9
thoughtful 2.0
threat -2.2
threatening -2.4
thrill 2.3
thrilled 2.7
thrilling 2.5
tired -1.4
torture -3.2
toxic -2.5
tragedy -2.9
tragic -2.8
trash -2.0
trauma -2.6
traumatic -2.8
treasure 2.3
tremendous 2.5
triumph 2.6
troll -1.9
trouble -1.8
trust 2.0
trusted 2.1
truth 1.6
ugly -2.3
unbearable -2.8
uncomfortable -1.6
unfair -2.2
unfortunate -1.9
unfortunately -1.6
unhappy -2.2
unique 1.5
unpleasant -1.9
unwatchable -2.9
upset -1.9
useful 1.7
useless -2.1
valuable 1.9
vibrant 2.0
vicious -2.6
victim -1.9
victory 2.5
vile -3.0
villain -2.5
violence -2.9
violent -2.8
vulnerable -1.2
war -2.6
warm 1.6
waste -1.8
wasted -2.0
weak -1.7
wealth 2.0
weird -0.9
welcome 1.7
well 1.1
win 2.4
winner 2.6
winning 2.4
wisdom 2.2
wise 2.2
woe -2.1
won 2.7
wonderful 2.7
worried -1.9
worry -1.9
worrying -1.9
worse -2.7
worst -3.1
worthless -2.7
worthy 1.9
wow 2.8
wrong -1.6
wtf -2.4
yay 2.4
yikes -1.3
";

/// Parse and validate an embedded lexicon table. Every line must hold a
/// single-word token and a finite valence within -4..=4; duplicates are
/// rejected so a bad edit to the table fails loudly instead of silently
/// shadowing an entry.
pub(crate) fn parse_lexicon(raw: &str) -> Result<AHashMap<String, f64>> {
    let mut map = AHashMap::with_capacity(512);
    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (token, value) = match (fields.next(), fields.next()) {
            (Some(t), Some(v)) => (t, v),
            _ => bail!("lexicon line {}: expected `token valence`, got {:?}", idx + 1, line),
        };
        ensure!(
            fields.next().is_none(),
            "lexicon line {}: unexpected trailing field in {:?}",
            idx + 1,
            line
        );
        let valence: f64 = value
            .parse()
            .map_err(|_| anyhow::anyhow!("lexicon line {}: invalid valence {:?}", idx + 1, value))?;
        ensure!(
            valence.is_finite() && valence.abs() <= 4.0,
            "lexicon line {}: valence {} outside -4..=4",
            idx + 1,
            valence
        );
        if map.insert(token.to_lowercase(), valence).is_some() {
            bail!("lexicon line {}: duplicate token {:?}", idx + 1, token);
        }
    }
    ensure!(!map.is_empty(), "lexicon table is empty");
    Ok(map)
}
